//! Built-in sample diagrams, one per Mermaid diagram type we know renders
//! with a current mermaid-cli.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Example {
    pub name: &'static str,
    pub source: &'static str,
}

/// Kept in alphabetical order by name.
pub const EXAMPLES: &[Example] = &[
    Example {
        name: "Architecture",
        source: "architecture-beta
    group edge(cloud)[Edge]
    group core(cloud)[Core]

    service cdn(internet)[CDN] in edge
    service api(server)[API] in core
    service db(database)[Postgres] in core
    service blobs(disk)[Blob store] in core

    cdn:B -- T:api
    api:R -- L:db
    api:B -- T:blobs",
    },
    Example {
        name: "Block Diagram",
        source: "block-beta
    columns 3
    Editor space Preview
    space Bridge space
    Editor --> Bridge
    Bridge --> Preview
    style Bridge fill:#ccebc5,stroke:#252,stroke-width:2px",
    },
    Example {
        name: "C4 Diagram",
        source: "C4Context
    title Diagram editor - system context
    Person(author, \"Author\", \"Writes diagrams as text\")
    System(studio, \"Mermaid Studio\", \"Desktop editor with live preview\")
    System_Ext(mmdc, \"mermaid-cli\", \"Renders Mermaid to PNG\")
    System_Ext(chrome, \"Headless Chrome\", \"Draws the SVG\")
    Rel(author, studio, \"Edits diagrams\")
    Rel(studio, mmdc, \"Spawns\")
    Rel(mmdc, chrome, \"Drives via Puppeteer\")",
    },
    Example {
        name: "Class Diagram",
        source: "classDiagram
    class Document {
      +String text
      +Path path
      +bool dirty
      +save()
    }
    class RenderRequest {
      +String source
      +Options options
    }
    class RenderBridge {
      +render(request) Result
    }
    Document ..> RenderRequest : snapshot
    RenderBridge --> RenderRequest : consumes",
    },
    Example {
        name: "Entity Relationship Diagram",
        source: "erDiagram
    AUTHOR ||--o{ DIAGRAM : writes
    DIAGRAM ||--|{ REVISION : has
    REVISION ||--o| EXPORT : produces
    AUTHOR {
      int id PK
      string name
    }
    DIAGRAM {
      int id PK
      int author_id FK
      string title
    }
    REVISION {
      int id PK
      int diagram_id FK
      datetime saved_at
    }",
    },
    Example {
        name: "Flowchart",
        source: "flowchart LR
    %% Render pipeline with a fallback branch
    A[Edit text] --> B{Renderer found?}
    B -- Yes --> C[Write scratch file]
    B -- No --> D[Ask for mmdc path]
    C --> E[Spawn mmdc]
    subgraph Renderer
      E --> F[(PNG)]
    end
    F --> G[Show preview]
    classDef ok fill:#eaffea,stroke:#5cb85c,color:#2d662d
    class C,G ok",
    },
    Example {
        name: "Gantt",
        source: "gantt
    dateFormat YYYY-MM-DD
    title Editor release
    excludes weekends
    section Design
    Wireframes      :d1, 2025-03-03, 5d
    Review          :after d1, 2d
    section Build
    Render bridge   :b1, 2025-03-12, 8d
    Preview pane    :b2, after b1, 5d
    section Ship
    Release         :milestone, m1, after b2, 1d",
    },
    Example {
        name: "Gitgraph (Git) Diagram",
        source: "gitGraph
    commit id: \"scaffold\"
    branch preview
    checkout preview
    commit id: \"zoom\"
    commit id: \"pan\"
    checkout main
    commit id: \"settings\"
    merge preview tag: \"v0.1\"",
    },
    Example {
        name: "Kanban",
        source: "kanban
    Backlog
      [Find and replace]
      [Recent files]
    Doing
      [Auto render]
    Done
      [Export PNG]",
    },
    Example {
        name: "Mindmaps",
        source: "mindmap
  root((Studio))
    Editing
      Find
      Replace
    Rendering
      Themes
      Sketch mode
    Files
      Open
      Save
      Export",
    },
    Example {
        name: "Packet",
        source: "packet-beta
    title UDP datagram
    0-15: \"Source Port\"
    16-31: \"Destination Port\"
    32-47: \"Length\"
    48-63: \"Checksum\"
    64-127: \"Data\"",
    },
    Example {
        name: "Pie Chart",
        source: "pie title Time spent per render
    \"Browser startup\" : 70
    \"Layout\" : 18
    \"PNG encode\" : 9
    \"Scratch I/O\" : 3",
    },
    Example {
        name: "Quadrant Chart",
        source: "quadrantChart
    title Feature triage
    x-axis Low effort --> High effort
    y-axis Low value --> High value
    quadrant-1 Plan
    quadrant-2 Do now
    quadrant-3 Skip
    quadrant-4 Maybe
    Auto render: [0.3, 0.8]
    Export SVG: [0.6, 0.5]
    Plugins: [0.9, 0.4]
    Dark theme: [0.2, 0.6]",
    },
    Example {
        name: "Radar",
        source: "radar-beta
    axis s[\"Speed\"], r[\"Reliability\"], u[\"Usability\"], p[\"Portability\"]
    curve a[\"Now\"]{60, 70, 55, 80}
    curve b[\"Target\"]{80, 90, 85, 85}",
    },
    Example {
        name: "Requirement Diagram",
        source: "requirementDiagram
    requirement R1 {
      id: 1
      text: Preview updates after editing stops
      risk: medium
      verifymethod: test
    }
    requirement R2 {
      id: 2
      text: No orphaned renderer processes
      risk: high
      verifymethod: test
    }
    element Scheduler {
      type: component
    }
    Scheduler - satisfies -> R1
    Scheduler - satisfies -> R2",
    },
    Example {
        name: "Sankey",
        source: "sankey-beta

Renders,Succeeded,82
Renders,Syntax errors,14
Renders,Timed out,3
Renders,Renderer missing,1",
    },
    Example {
        name: "Sequence Diagram",
        source: "sequenceDiagram
    autonumber
    participant U as User
    participant S as Studio
    participant M as mmdc
    U->>S: Edit diagram
    S->>S: Debounce
    S->>M: -i scratch.mmd -o preview.png
    activate M
    M-->>S: exit 0
    deactivate M
    S-->>U: Show preview
    opt Syntax error
      M-->>S: exit 1 + stderr
      S-->>U: Show diagnostics
    end",
    },
    Example {
        name: "State Diagram",
        source: "stateDiagram-v2
    [*] --> Idle
    Idle --> Rendering : render()
    Rendering --> Idle : success
    Rendering --> Failed : error
    Rendering --> Rendering : superseded
    Failed --> Rendering : retry()",
    },
    Example {
        name: "Timeline",
        source: "timeline
    title Studio milestones
    2025-01 : Editor and preview
    2025-02 : Auto render
    2025-03 : Themes and sketch mode
    2025-04 : First release",
    },
    Example {
        name: "User Journey",
        source: "journey
    title First diagram
    section Install
      Install mmdc: 3: Author
      Open studio: 5: Author
    section Draw
      Pick an example: 5: Author
      Edit it: 4: Author
    section Share
      Export PNG: 5: Author",
    },
    Example {
        name: "XY Chart",
        source: "xychart-beta
    title \"Renders per day\"
    x-axis [mon, tue, wed, thu, fri]
    y-axis \"Renders\" 0 --> 200
    bar [120, 150, 170, 140, 90]
    line [120, 150, 170, 140, 90]",
    },
];

/// Example names, alphabetical.
pub fn names() -> impl Iterator<Item = &'static str> {
    EXAMPLES.iter().map(|e| e.name)
}

pub fn get(name: &str) -> Option<&'static str> {
    EXAMPLES.iter().find(|e| e.name == name).map(|e| e.source)
}
