//! Conversion entry points.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::raster::{CanvasPadding, render_char};
use crate::threshold::{apply_threshold, to_bit_rows};
use crate::{
    BitsyFont, BitsyFontBuilder, CancellationToken, ConversionPhase, ConversionProgress, ConvertError, GenerationRequest, GlyphBitmap, Result,
    SharedBaseline, VectorFont, long_running_loop,
};

/// Convert the font of `request` into a bitsyfont document.
///
/// Fails with [`ConvertError::Cancelled`] as soon as `ct` is found armed at a
/// checkpoint, in which case nothing is produced.
pub async fn generate<F: VectorFont>(ct: &CancellationToken, name: &str, request: &GenerationRequest<F>) -> Result<String> {
    generate_with_progress(ct, &ConversionProgress::new(), name, request).await
}

/// [`generate`], reporting progress to `progress`.
pub async fn generate_with_progress<F: VectorFont>(
    ct: &CancellationToken,
    progress: &ConversionProgress,
    name: &str,
    request: &GenerationRequest<F>,
) -> Result<String> {
    let font = build_font(ct, progress, name, request).await?;
    Ok(font.to_string())
}

/// Run both conversion passes and return the cropped font.
pub async fn build_font<F: VectorFont>(
    ct: &CancellationToken,
    progress: &ConversionProgress,
    name: &str,
    request: &GenerationRequest<F>,
) -> Result<BitsyFont> {
    ct.throw_if_cancelled().inspect_err(|_| log::info!("conversion of '{name}' cancelled before start"))?;
    request.validate()?;

    let font = &request.font;
    let font_size = request.font_size;
    let source = request.codepoints();
    let total = source.len();
    log::debug!("converting '{name}': {total} codepoints at {font_size}px");

    progress.begin_phase(ConversionPhase::Baseline, total);
    let mut shared = SharedBaseline::new(font_size);
    long_running_loop(&source, |ch, _, _| {
        shared.add(font, ch);
        progress.advance();
        ct.throw_if_cancelled()
    })
    .await
    .inspect_err(|e| log_abort(name, e))?;

    let baseline = shared.get();
    log::debug!("shared baseline {baseline}");

    progress.begin_phase(ConversionPhase::Rasterize, total);
    let padding = request.canvas_padding();
    let mut builder = BitsyFontBuilder::new();
    long_running_loop(&source, |ch, _, _| {
        builder.push(rasterize_glyph(font, ch, font_size, baseline, request.max_black, request.min_white, padding));
        progress.advance();
        ct.throw_if_cancelled()
    })
    .await
    .inspect_err(|e| log_abort(name, e))?;

    let result = builder.finish(name);
    log::debug!("'{name}': {} glyphs, grid {}x{}", result.glyphs.len(), result.width, result.height);
    progress.finish();
    Ok(result)
}

/// Render, threshold and binarize one glyph.
pub fn rasterize_glyph<F: VectorFont + ?Sized>(
    font: &F,
    ch: char,
    font_size: u32,
    baseline: f32,
    black: u8,
    white: u8,
    padding: CanvasPadding,
) -> GlyphBitmap {
    let mut canvas = render_char(font, ch, font_size, baseline, padding);
    apply_threshold(&mut canvas, black, white);
    GlyphBitmap {
        codepoint: ch,
        rows: to_bit_rows(&canvas),
        canvas_width: canvas.width(),
        canvas_height: canvas.height(),
    }
}

fn log_abort(name: &str, err: &ConvertError) {
    if err.is_cancelled() {
        log::info!("conversion of '{name}' cancelled");
    } else {
        log::error!("conversion of '{name}' failed: {err}");
    }
}

/// A conversion running on the tokio runtime.
///
/// Dropping the handle does not stop the conversion; call
/// [`ConversionTask::cancel`] for that.
pub struct ConversionTask {
    token: CancellationToken,
    progress: Arc<ConversionProgress>,
    handle: JoinHandle<Result<String>>,
}

impl ConversionTask {
    /// Start converting on the current runtime. Must be called from within a tokio runtime.
    pub fn spawn<F>(name: impl Into<String>, request: GenerationRequest<F>) -> Self
    where
        F: VectorFont + Send + Sync + 'static,
    {
        let name = name.into();
        let token = CancellationToken::new();
        let progress = Arc::new(ConversionProgress::new());

        let task_token = token.clone();
        let task_progress = progress.clone();
        let handle = tokio::spawn(async move { generate_with_progress(&task_token, &task_progress, &name, &request).await });

        Self { token, progress, handle }
    }

    /// Arm the cancellation token; the task stops at its next checkpoint.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// A token that cancels this task, usable after the handle was consumed by `join`
    pub fn cancel_handle(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn progress(&self) -> &ConversionProgress {
        &self.progress
    }

    pub fn shared_progress(&self) -> Arc<ConversionProgress> {
        self.progress.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the conversion to finish.
    pub async fn join(self) -> Result<String> {
        match self.handle.await {
            Ok(result) => result,
            Err(err) => Err(ConvertError::TaskFailed { message: err.to_string() }),
        }
    }
}
