use rayon::prelude::*;

use crate::animation::jiggle::JiggleParams;
use crate::animation::mouth::MouthShape;
use crate::assets::store::CharacterAssets;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{StickcastError, StickcastResult};
use crate::render::FrameRGBA;
use crate::render::cache::{FramePlan, SignaturePolicy, plan_frames};
use crate::render::frame::FrameRenderer;
use crate::timeline::compiler::Timeline;

/// Knobs for [`render_timeline`].
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOpts {
    /// Squash-and-stretch the body around pose changes.
    pub jiggle: bool,
    /// Copy frames whose signature was already rendered.
    pub frame_caching: bool,
    /// What makes two frames identical.
    pub signature_policy: SignaturePolicy,
    /// Render unique frames on a rayon pool.
    pub parallel: bool,
    /// Worker count; `None` uses rayon's default.
    pub threads: Option<usize>,
    /// Frames planned per parallel batch.
    pub chunk_size: usize,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            jiggle: false,
            frame_caching: true,
            signature_policy: SignaturePolicy::default(),
            parallel: false,
            threads: None,
            chunk_size: 64,
        }
    }
}

/// Counters from one render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames delivered to the sink.
    pub frames_total: u64,
    /// Frames composited.
    pub frames_rendered: u64,
    /// Frames delivered as copies.
    pub frames_elided: u64,
}

/// Render every frame of `timeline` into `sink`, in frame order.
///
/// Frames with a signature seen earlier are delivered through [`FrameSink::push_duplicate`].
/// Parallel and sequential modes deliver identical output.
#[tracing::instrument(skip_all, fields(frames = timeline.frame_count(), parallel = opts.parallel))]
pub fn render_timeline(
    timeline: &Timeline,
    assets: &CharacterAssets,
    jiggle: JiggleParams,
    opts: &RenderOpts,
    sink: &mut dyn FrameSink,
) -> StickcastResult<RenderStats> {
    if timeline.frame_count() == 0 {
        return Err(StickcastError::validation("timeline has no frames to render"));
    }
    check_timeline_fits(timeline, assets)?;
    let pool = if opts.parallel {
        Some(build_thread_pool(opts.threads)?)
    } else {
        None
    };

    let plan = plan_frames(
        timeline.states(),
        opts.signature_policy,
        opts.frame_caching,
    );
    let renderer = FrameRenderer::new(assets, opts.jiggle.then_some(jiggle));
    let canvas = assets.canvas();

    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps: timeline.opts().fps,
        frame_count: timeline.frame_count(),
    })?;

    match pool {
        None => emit_sequential(&plan, &renderer, sink)?,
        Some(pool) => emit_parallel(
            &plan,
            &renderer,
            &pool,
            normalized_chunk_size(opts.chunk_size),
            sink,
        )?,
    }
    sink.end()?;

    let total = plan.frame_count() as u64;
    let rendered = plan.unique.len() as u64;
    let stats = RenderStats {
        frames_total: total,
        frames_rendered: rendered,
        frames_elided: total.saturating_sub(rendered),
    };
    tracing::info!(
        frames = stats.frames_total,
        rendered = stats.frames_rendered,
        elided = stats.frames_elided,
        "render finished"
    );
    Ok(stats)
}

/// Reject pose, emotion and mouth ids the assets cannot draw before anything reaches the sink.
fn check_timeline_fits(timeline: &Timeline, assets: &CharacterAssets) -> StickcastResult<()> {
    let max_pose = timeline.poses.iter().map(|e| e.value).max().unwrap_or(0);
    let max_mouth = timeline
        .mouth
        .iter()
        .copied()
        .max()
        .unwrap_or(MouthShape::CLOSED);
    for e in &timeline.emotions {
        assets.body_index(e.value, max_pose)?;
        assets.mouth_index(max_mouth, e.value)?;
    }
    Ok(())
}

fn emit_sequential(
    plan: &FramePlan,
    renderer: &FrameRenderer<'_>,
    sink: &mut dyn FrameSink,
) -> StickcastResult<()> {
    for (i, &u) in plan.frame_to_unique.iter().enumerate() {
        let idx = FrameIndex(i as u64);
        let representative = &plan.unique[u];
        if representative.frame == idx {
            let frame = renderer.render(representative)?;
            sink.push_frame(idx, &frame)?;
        } else {
            sink.push_duplicate(idx, representative.frame)?;
        }
        if (i + 1) % 100 == 0 {
            tracing::debug!(frame = i + 1, "rendered");
        }
    }
    Ok(())
}

fn emit_parallel(
    plan: &FramePlan,
    renderer: &FrameRenderer<'_>,
    pool: &rayon::ThreadPool,
    chunk_size: usize,
    sink: &mut dyn FrameSink,
) -> StickcastResult<()> {
    let frame_count = plan.frame_count();
    let mut chunk_start = 0usize;
    while chunk_start < frame_count {
        let chunk_end = (chunk_start + chunk_size).min(frame_count);

        // Representatives first appear in their own chunk; duplicates only look backwards.
        let fresh: Vec<usize> = (chunk_start..chunk_end)
            .filter(|&i| plan.is_representative(i))
            .map(|i| plan.frame_to_unique[i])
            .collect();

        let rendered = pool.install(|| {
            fresh
                .par_iter()
                .map(|&u| renderer.render(&plan.unique[u]))
                .collect::<Vec<StickcastResult<FrameRGBA>>>()
        });
        let mut rendered = rendered.into_iter();

        for i in chunk_start..chunk_end {
            let idx = FrameIndex(i as u64);
            let representative = &plan.unique[plan.frame_to_unique[i]];
            if representative.frame == idx {
                let frame = rendered.next().ok_or_else(|| {
                    StickcastError::evaluation("internal error: rendered frame missing")
                })??;
                sink.push_frame(idx, &frame)?;
            } else {
                sink.push_duplicate(idx, representative.frame)?;
            }
        }
        tracing::debug!(frame = chunk_end, "chunk rendered");
        chunk_start = chunk_end;
    }
    Ok(())
}

/// Build the worker pool. `threads == Some(0)` is rejected.
pub fn build_thread_pool(threads: Option<usize>) -> StickcastResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(StickcastError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| StickcastError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> usize {
    chunk_size.max(1)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
