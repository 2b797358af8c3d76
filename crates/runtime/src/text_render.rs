use suika::{ascii_board, Frame, RenderSignal, Renderer};

const COLUMNS: usize = 40;
const ROWS: usize = 24;

/// Logs a coarse ASCII board every few frames and at the end of each step.
pub struct TextRenderer {
    every: u64,
    frames: u64,
}

impl TextRenderer {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            frames: 0,
        }
    }
}

impl Renderer for TextRenderer {
    fn draw(&mut self, frame: &Frame<'_>) -> RenderSignal {
        self.frames += 1;
        if self.frames % self.every == 0 || frame.frames_remaining == 0 {
            tracing::info!(
                score = frame.score,
                fruits = frame.particles.len(),
                next = frame.spawner.next().kind,
                "\n{}",
                ascii_board(frame, COLUMNS, ROWS)
            );
        }
        RenderSignal::Continue
    }
}
