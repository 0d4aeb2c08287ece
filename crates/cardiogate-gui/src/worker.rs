use std::path::Path;
use std::sync::mpsc;
use std::time::Instant;

use anyhow::{Context, Result};
use cardiogate_core::frame::Frame;
use cardiogate_core::gating::{AppConfig, GatingEngine, GatingInput};
use cardiogate_core::io::frame_dir::check_uniform;
use cardiogate_core::io::FrameDirectory;
use cardiogate_core::range::FrameRange;
use cardiogate_core::report::ContourReport;

use crate::messages::{WorkerCommand, WorkerResult};
use crate::state::RunningTask;

/// Acquisition data living on the worker thread.
#[derive(Default)]
struct AcquisitionCache {
    frames: Vec<Frame>,
    report: ContourReport,
}

/// Spawn the worker thread. Returns the command sender.
pub fn spawn_worker(
    result_tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) -> std::io::Result<mpsc::Sender<WorkerCommand>> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();

    std::thread::Builder::new()
        .name("cardiogate-worker".into())
        .spawn(move || {
            worker_loop(cmd_rx, result_tx, ctx);
        })?;

    Ok(cmd_tx)
}

fn send(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, result: WorkerResult) {
    let _ = tx.send(result);
    ctx.request_repaint();
}

fn send_log(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, msg: impl Into<String>) {
    send(tx, ctx, WorkerResult::Log { message: msg.into() });
}

fn send_error(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, err: anyhow::Error) {
    tracing::warn!("{err:#}");
    send(
        tx,
        ctx,
        WorkerResult::Error {
            message: format!("{err:#}"),
        },
    );
}

fn worker_loop(
    cmd_rx: mpsc::Receiver<WorkerCommand>,
    tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) {
    let mut cache = AcquisitionCache::default();

    while let Ok(cmd) = cmd_rx.recv() {
        let outcome = match cmd {
            WorkerCommand::LoadFrames { dir } => {
                send(&tx, &ctx, WorkerResult::TaskStarted { task: RunningTask::LoadingFrames });
                handle_load_frames(&dir, &mut cache, &tx, &ctx)
            }
            WorkerCommand::LoadReport { path } => {
                send(&tx, &ctx, WorkerResult::TaskStarted { task: RunningTask::LoadingReport });
                handle_load_report(&path, &mut cache, &tx, &ctx)
            }
            WorkerCommand::PreviewFrame { index } => {
                if let Some(frame) = cache.frames.get(index) {
                    send(
                        &tx,
                        &ctx,
                        WorkerResult::FramePreview {
                            frame: frame.clone(),
                            index,
                        },
                    );
                }
                Ok(())
            }
            WorkerCommand::RunGating { range, config } => {
                handle_run_gating(range, &config, &cache, &tx, &ctx)
            }
        };
        if let Err(err) = outcome {
            send_error(&tx, &ctx, err);
        }
    }
}

fn handle_load_frames(
    dir: &Path,
    cache: &mut AcquisitionCache,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) -> Result<()> {
    let seq = FrameDirectory::open(dir)
        .with_context(|| format!("No frames found in {}", dir.display()))?;
    let total = seq.frame_count();

    let mut frames = Vec::with_capacity(total);
    for (i, frame) in seq.frames().enumerate() {
        frames.push(frame.with_context(|| format!("Failed to read {}", seq.paths()[i].display()))?);
        send(
            tx,
            ctx,
            WorkerResult::Progress {
                items_done: Some(i + 1),
                items_total: Some(total),
            },
        );
    }
    check_uniform(&frames)?;

    let size = frames
        .first()
        .map(|f| [f.width(), f.height()])
        .unwrap_or_default();
    cache.frames = frames;
    send(
        tx,
        ctx,
        WorkerResult::FramesLoaded {
            dir: dir.to_path_buf(),
            count: total,
            size,
        },
    );
    if let Some(first) = cache.frames.first() {
        send(
            tx,
            ctx,
            WorkerResult::FramePreview {
                frame: first.clone(),
                index: 0,
            },
        );
    }
    Ok(())
}

fn handle_load_report(
    path: &Path,
    cache: &mut AcquisitionCache,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) -> Result<()> {
    let report = ContourReport::load_csv(path)
        .with_context(|| format!("Failed to read report {}", path.display()))?;
    let rows = report.len();
    cache.report = report;
    send(
        tx,
        ctx,
        WorkerResult::ReportLoaded {
            path: path.to_path_buf(),
            rows,
        },
    );
    Ok(())
}

fn handle_run_gating(
    range: FrameRange,
    config: &AppConfig,
    cache: &AcquisitionCache,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) -> Result<()> {
    let start = Instant::now();
    let input = GatingInput::select(
        &cache.frames,
        &cache.report,
        range,
        config.gating.intramural_threshold,
    )?;
    send_log(
        tx,
        ctx,
        format!("Gating frames {}-{}", range.lower + 1, range.upper),
    );

    let engine = GatingEngine::from_app_config(config, None)?;
    let traces = engine.prepare(&input)?;
    let auto = engine.gate(&traces, &input.report);

    send(
        tx,
        ctx,
        WorkerResult::GatingComplete {
            traces: Box::new(traces),
            auto,
            elapsed: start.elapsed(),
        },
    );
    Ok(())
}
