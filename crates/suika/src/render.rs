//! Read-only render hook.
//!
//! The environment hands a [`Frame`] to an installed [`Renderer`] after every
//! physics sub-step and once at reset. A renderer cannot change the episode;
//! it can only ask to stop it by returning [`RenderSignal::Quit`].

use physics::ParticleView;

use crate::config::LaneConfig;
use crate::spawner::Spawner;

/// Snapshot handed to a [`Renderer`].
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub spawner: &'a Spawner,
    pub particles: &'a [ParticleView],
    pub lane: &'a LaneConfig,
    pub score: f32,
    pub game_over: bool,
    /// Sub-steps left in the current environment step.
    pub frames_remaining: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderSignal {
    Continue,
    Quit,
}

pub trait Renderer {
    fn draw(&mut self, frame: &Frame<'_>) -> RenderSignal;
}

/// Rasterize the lane into a `cols` x `rows` character grid.
///
/// Particles are drawn as their tier digit (`a`, `b`, ... past 9), the kill
/// line as `-` and the pending piece as `v` on the top row.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn ascii_board(frame: &Frame<'_>, cols: usize, rows: usize) -> String {
    let cols = cols.max(1);
    let rows = rows.max(2);
    let lane = frame.lane;
    // top row is reserved for the spawner
    let top = lane.kill_y.min(lane.top);
    let cell_w = lane.width() / cols as f32;
    let cell_h = (lane.bot - top) / (rows - 1) as f32;

    let col_of = |x: f32| (((x - lane.left) / cell_w).floor().max(0.0) as usize).min(cols - 1);
    let row_of = |y: f32| (((y - top) / cell_h).floor().max(0.0) as usize).min(rows - 2) + 1;

    let mut grid = vec![vec![' '; cols]; rows];
    grid[0][col_of(frame.spawner.current().x)] = 'v';
    let kill_row = row_of(lane.kill_y);
    grid[kill_row].iter_mut().for_each(|c| *c = '-');

    for p in frame.particles.iter().filter(|p| p.alive) {
        if p.position.y < top {
            continue;
        }
        let glyph = std::char::from_digit(u32::try_from(p.kind).unwrap_or(35).min(35), 36)
            .unwrap_or('?');
        grid[row_of(p.position.y)][col_of(p.position.x)] = glyph;
    }

    let mut out = String::with_capacity((cols + 3) * rows);
    for row in grid {
        out.push('|');
        out.extend(row);
        out.push('|');
        out.push('\n');
    }
    out
}
