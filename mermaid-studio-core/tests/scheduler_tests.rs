//! Overlapping renders through the scheduler.

#![cfg(unix)]

mod common;

use mermaid_studio_core::{
    CacheDir, RenderBridge, RenderError, RenderOptions, RenderRequest, RenderScheduler,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn scheduler_in(dir: &Path) -> Arc<RenderScheduler> {
    RenderScheduler::new(RenderBridge::new(CacheDir::new(dir.join("cache"))))
}

fn request(scheduler: &RenderScheduler, text: &str, renderer: &Path) -> RenderRequest {
    RenderRequest::new(
        text,
        scheduler.bridge().cache().preview_path(),
        RenderOptions {
            renderer: renderer.to_path_buf(),
            ..RenderOptions::default()
        },
    )
}

#[tokio::test]
async fn newer_submission_supersedes_the_render_in_flight() {
    let work = TempDir::new().unwrap();
    let fake = common::succeeding_after(Duration::from_secs(2), 8, 8);
    let scheduler = scheduler_in(work.path());

    let first = {
        let scheduler = scheduler.clone();
        let req = request(&scheduler, "graph TD; A-->B;", &fake.script);
        tokio::spawn(async move { scheduler.submit(req).await })
    };
    common::wait_for_pid(&fake).await;

    let second = scheduler
        .submit(request(&scheduler, "graph TD; A-->C;", &fake.script))
        .await;
    let first = first.await.unwrap();

    assert_eq!(*first.result.as_ref().unwrap_err(), RenderError::Cancelled);
    assert!(!scheduler.is_current(&first));

    assert!(scheduler.is_current(&second));
    let image = second.result.expect("newest render succeeds");
    assert_eq!((image.width, image.height), (8, 8));
    assert_eq!(
        std::fs::read_to_string(fake.input_log()).unwrap(),
        "graph TD; A-->C;"
    );
    assert!(!scheduler.is_rendering());
}

#[tokio::test]
async fn rapid_submissions_only_render_the_last() {
    let work = TempDir::new().unwrap();
    let fake = common::succeeding_after(Duration::from_millis(500), 4, 4);
    let scheduler = scheduler_in(work.path());

    let first = {
        let scheduler = scheduler.clone();
        let req = request(&scheduler, "graph TD; one", &fake.script);
        tokio::spawn(async move { scheduler.submit(req).await })
    };
    common::wait_for_pid(&fake).await;

    let second = {
        let scheduler = scheduler.clone();
        let req = request(&scheduler, "graph TD; two", &fake.script);
        tokio::spawn(async move { scheduler.submit(req).await })
    };
    // Give the second submission time to take the in-flight slot.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let third = scheduler
        .submit(request(&scheduler, "graph TD; three", &fake.script))
        .await;

    let first = first.await.unwrap();
    let second = second.await.unwrap();

    assert_eq!(*first.result.as_ref().unwrap_err(), RenderError::Cancelled);
    assert_eq!(second.result.unwrap_err(), RenderError::Cancelled);
    assert!(third.result.is_ok());
    assert_eq!(third.generation, 3);
    assert_eq!(scheduler.latest_generation(), 3);
    assert_eq!(
        std::fs::read_to_string(fake.input_log()).unwrap(),
        "graph TD; three"
    );
}

#[tokio::test]
async fn generations_increase_per_submission() {
    let work = TempDir::new().unwrap();
    let fake = common::succeeding(2, 2);
    let scheduler = scheduler_in(work.path());

    let a = scheduler.submit(request(&scheduler, "graph TD; A", &fake.script)).await;
    let b = scheduler.submit(request(&scheduler, "graph TD; B", &fake.script)).await;

    assert!(b.generation > a.generation);
    assert!(a.result.is_ok());
    assert!(b.result.is_ok());
    assert!(!scheduler.is_current(&a));
    assert!(scheduler.is_current(&b));
}

#[tokio::test]
async fn explicit_cancel_stops_the_render() {
    let work = TempDir::new().unwrap();
    let fake = common::hanging();
    let scheduler = scheduler_in(work.path());

    let pending = {
        let scheduler = scheduler.clone();
        let req = request(&scheduler, "graph TD; A", &fake.script);
        tokio::spawn(async move { scheduler.submit(req).await })
    };
    common::wait_for_pid(&fake).await;
    assert!(scheduler.is_rendering());

    scheduler.cancel();
    let outcome = tokio::time::timeout(Duration::from_secs(5), pending)
        .await
        .expect("cancel returns promptly")
        .unwrap();

    assert_eq!(*outcome.result.as_ref().unwrap_err(), RenderError::Cancelled);
}

#[tokio::test]
async fn discard_cancels_and_makes_the_outcome_stale() {
    let work = TempDir::new().unwrap();
    let fake = common::hanging();
    let scheduler = scheduler_in(work.path());

    let pending = {
        let scheduler = scheduler.clone();
        let req = request(&scheduler, "graph TD; Old", &fake.script);
        tokio::spawn(async move { scheduler.submit(req).await })
    };
    common::wait_for_pid(&fake).await;

    let latest = scheduler.discard();
    let outcome = tokio::time::timeout(Duration::from_secs(5), pending)
        .await
        .expect("discard returns promptly")
        .unwrap();

    assert_eq!(outcome.generation, 1);
    assert_eq!(latest, 2);
    assert_eq!(*outcome.result.as_ref().unwrap_err(), RenderError::Cancelled);
    assert!(!scheduler.is_current(&outcome));
    assert!(!scheduler.is_rendering());
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn shutdown_leaves_no_renderer_running() {
    let work = TempDir::new().unwrap();
    let fake = common::hanging();
    let scheduler = scheduler_in(work.path());

    let pending = {
        let scheduler = scheduler.clone();
        let req = request(&scheduler, "graph TD; A", &fake.script);
        tokio::spawn(async move { scheduler.submit(req).await })
    };
    let pid = common::wait_for_pid(&fake).await;

    tokio::time::timeout(Duration::from_secs(5), scheduler.shutdown())
        .await
        .expect("shutdown completes promptly");

    let outcome = pending.await.unwrap();
    assert_eq!(*outcome.result.as_ref().unwrap_err(), RenderError::Cancelled);

    let mut gone = false;
    for _ in 0..100 {
        if common::process_gone(pid) {
            gone = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(gone, "renderer process {} outlived shutdown", pid);
}

#[tokio::test]
async fn submit_after_shutdown_is_cancelled_without_spawning() {
    let work = TempDir::new().unwrap();
    let fake = common::succeeding(2, 2);
    let scheduler = scheduler_in(work.path());

    scheduler.shutdown().await;
    let outcome = scheduler.submit(request(&scheduler, "graph TD; A", &fake.script)).await;

    assert_eq!(*outcome.result.as_ref().unwrap_err(), RenderError::Cancelled);
    assert!(fake.logged_args().is_empty());
}
