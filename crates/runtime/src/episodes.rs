//! Episode loops behind the CLI commands.

use anyhow::Result;
use serde::Serialize;
use suika::{Action, ActionSpace, Env, GameConfig, ResetOptions, SuikaEnv};

use crate::text_render::TextRenderer;

pub struct RandomOptions {
    pub episodes: u64,
    pub seed: u64,
    pub discrete: Option<usize>,
    pub scatter: bool,
    pub max_steps: Option<u64>,
    /// Render every this many frames; `None` disables rendering.
    pub render_every: Option<u64>,
}

/// One line of `random` output.
#[derive(Debug, Serialize)]
struct EpisodeSummary {
    episode: u64,
    seed: u64,
    steps: u64,
    score: f32,
    #[serde(rename = "return")]
    total_reward: f32,
    game_over: bool,
    truncated: bool,
}

/// One line of `sweep` output.
#[derive(Debug, Serialize)]
struct SweepReport {
    action: usize,
    target_x: f32,
    released_x: f32,
}

pub fn random(config: GameConfig, options: &RandomOptions) -> Result<()> {
    let space = options
        .discrete
        .map_or(ActionSpace::Continuous, |bins| ActionSpace::Discrete { bins });
    let mut env = SuikaEnv::new(config, space)?;
    if let Some(every) = options.render_every {
        env = env.with_renderer(Box::new(TextRenderer::new(every)));
    }
    let reset = ResetOptions {
        scatter: options.scatter,
    };

    for episode in 0..options.episodes {
        let seed = options.seed.wrapping_add(episode);
        let mut rng = fastrand::Rng::with_seed(seed);
        let summary = play_episode(&mut env, &mut rng, seed, &reset, options.max_steps)?;
        tracing::info!(episode, steps = summary.steps, score = summary.score, "episode finished");
        println!(
            "{}",
            serde_json::to_string(&EpisodeSummary { episode, ..summary })?
        );
    }
    Ok(())
}

fn play_episode<E: Env>(
    env: &mut E,
    rng: &mut fastrand::Rng,
    seed: u64,
    reset: &ResetOptions,
    max_steps: Option<u64>,
) -> Result<EpisodeSummary> {
    env.reset(Some(seed), reset)?;
    let space = env.action_space();
    let mut total_reward = 0.0;
    let mut truncated = false;

    let info = loop {
        let action = space.sample(rng);
        let step = env.step(action)?;
        tracing::debug!(?action, reward = step.reward, score = step.info.score, "step");
        total_reward += step.reward;
        if step.terminated {
            break step.info;
        }
        if max_steps.is_some_and(|max| step.info.steps >= max) {
            truncated = true;
            break step.info;
        }
    };

    Ok(EpisodeSummary {
        episode: 0,
        seed,
        steps: info.steps,
        score: info.score,
        total_reward,
        game_over: info.game_over,
        truncated,
    })
}

pub fn sweep(config: GameConfig, bins: usize, actions: &[usize], seed: u64) -> Result<()> {
    let mut env = SuikaEnv::new(config, ActionSpace::Discrete { bins })?;
    env.reset(Some(seed), &ResetOptions::default())?;

    for &index in actions {
        let action = Action::Discrete(index);
        let target_x = env.mapper().target_x(action)?;
        let released_x = env.spawner().map_or(target_x, |spawner| {
            let mut preview = spawner.clone();
            preview.set_current_x(target_x);
            preview.current().x
        });
        let step = env.step(action)?;
        println!(
            "{}",
            serde_json::to_string(&SweepReport {
                action: index,
                target_x,
                released_x,
            })?
        );
        if step.terminated {
            tracing::warn!(action = index, "episode ended during sweep");
            break;
        }
    }
    Ok(())
}
