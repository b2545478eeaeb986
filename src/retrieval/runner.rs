use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::mask::ValidMask;
use crate::scene::Scene;

use super::RetrievalError;
use super::pixel::PixelResult;
use super::processor::StageOrchestrator;

/// Outputs of a whole scene. `values` is pixel interleaved: the slots of pixel
/// (`x`, `y`) start at `(y * width + x) * slot_count`.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneResult {
    width: usize,
    height: usize,
    slot_count: usize,
    values: Vec<f32>,
    flags: Vec<u16>,
}

impl SceneResult {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn flags(&self) -> &[u16] {
        &self.flags
    }

    pub fn pixel(&self, x: usize, y: usize) -> PixelResult {
        let index = y * self.width + x;
        let start = index * self.slot_count;
        PixelResult {
            values: self.values[start..start + self.slot_count].to_vec(),
            flags: self.flags[index],
        }
    }

    /// Row-major raster of one output slot
    pub fn band(&self, slot: usize) -> Vec<f32> {
        if slot >= self.slot_count {
            return Vec::new();
        }
        self.values
            .iter()
            .skip(slot)
            .step_by(self.slot_count)
            .copied()
            .collect()
    }
}

/// Process every pixel of `scene` in parallel, one row per task.
///
/// `cancel` is checked before each row; once it is set the run stops with
/// [`RetrievalError::Cancelled`] and partial results are dropped.
pub fn run_scene(
    orchestrator: &StageOrchestrator<'_>,
    scene: &Scene,
    mask: &ValidMask,
    cancel: &AtomicBool,
) -> Result<SceneResult, RetrievalError> {
    let (width, height) = (scene.width(), scene.height());
    let slot_count = orchestrator.slot_count();

    let mut values = vec![0.0_f32; width * height * slot_count];
    let mut flags = vec![0_u16; width * height];

    let process_row = |y: usize, row_values: &mut [f32], row_flags: &mut [u16]| {
        if cancel.load(Ordering::Relaxed) {
            return Err(RetrievalError::Cancelled);
        }
        for (x, flag) in row_flags.iter_mut().enumerate() {
            let pixel = scene.pixel(x, y, mask.is_valid(x, y));
            let out = &mut row_values[x * slot_count..(x + 1) * slot_count];
            *flag = orchestrator.process_pixel_into(&pixel, out);
        }
        Ok(())
    };

    let row_len = width * slot_count;
    if row_len == 0 {
        flags
            .par_chunks_mut(width.max(1))
            .enumerate()
            .try_for_each(|(y, row_flags)| process_row(y, &mut [], row_flags))?;
    } else {
        values
            .par_chunks_mut(row_len)
            .zip(flags.par_chunks_mut(width))
            .enumerate()
            .try_for_each(|(y, (row_values, row_flags))| process_row(y, row_values, row_flags))?;
    }

    Ok(SceneResult {
        width,
        height,
        slot_count,
        values,
        flags,
    })
}
