use kdam::{tqdm, BarExt};
use tracing::{debug, info, trace};

use crate::agent::Agent;
use crate::config::TaskConfig;
use crate::env::{Env, Info, Observation};
use crate::error::TaskError;
use crate::returns::episodic_return;

/// Observer of a replayed episode, called with the initial state and after every step.
pub type RenderCallback<'a> = &'a mut dyn FnMut(&Observation, &Info);

enum Observer<'a> {
    Silent,
    Log,
    Callback(RenderCallback<'a>),
}

/// Runs episodes of one agent against one environment.
#[derive(Debug)]
pub struct RlTask<E: Env, A: Agent> {
    env: E,
    agent: A,
    config: TaskConfig,
}

impl<E: Env, A: Agent> RlTask<E, A> {
    pub fn new(env: E, agent: A) -> Self {
        Self::with_config(env, agent, TaskConfig::default())
    }

    pub fn with_config(env: E, agent: A, config: TaskConfig) -> Self {
        Self { env, agent, config }
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }

    fn notify(&self, observer: &mut Observer<'_>, observation: &Observation, info: &Info) {
        match observer {
            Observer::Silent => {}
            Observer::Log => info!("\n{}", self.env.render()),
            Observer::Callback(callback) => (*callback)(observation, info),
        }
    }

    /// Plays one episode, returning its discounted return. Learning hooks only
    /// run when the agent's `learning` flag is set.
    fn play_episode(
        &mut self,
        k: usize,
        max_steps: usize,
        mut observer: Observer<'_>,
    ) -> Result<f64, TaskError> {
        let (mut observation, info) = self.env.reset();
        self.agent.reset();
        self.notify(&mut observer, &observation, &info);
        let learning: bool = self.agent.learning();

        let mut t: usize = 0;
        while t < max_steps {
            let action: usize = self.agent.act(&observation)?;
            let step = self.env.step(action)?;
            self.agent.record_reward(step.reward);
            if learning {
                // a truncated episode still has a future beyond the cut
                let terminal: bool = step.terminated && !step.truncated;
                self.agent.on_step_end(t, &step.observation, terminal)?;
            }
            self.notify(&mut observer, &step.observation, &step.info);
            t += 1;
            let done: bool = step.done();
            observation = step.observation;
            if done {
                break;
            }
        }

        let episode_return: f64 = episodic_return(self.agent.rewards(), self.agent.gamma());
        debug!(episode = k, steps = t, episode_return, "episode finished");
        if learning {
            self.agent.on_episode_end(k)?;
        } else {
            self.agent.reset();
        }
        Ok(episode_return)
    }

    /// Runs `num_episodes` sequential episodes and returns, after each one, the
    /// mean of the discounted returns obtained so far in this call.
    pub fn run_episodes(&mut self, num_episodes: usize) -> Result<Vec<f64>, TaskError> {
        let max_steps: usize = self.agent.max_episode_steps();
        let mut averages: Vec<f64> = Vec::with_capacity(num_episodes);
        let mut average: f64 = 0.0;

        let mut pb = if self.config.show_progress {
            let mut pb = tqdm!(total = num_episodes);
            pb.set_description(self.agent.core().id.clone());
            pb.refresh();
            Some(pb)
        } else {
            None
        };

        for k in 0..num_episodes {
            let episode_return: f64 = self.play_episode(k, max_steps, Observer::Silent)?;
            average += (episode_return - average) / (k + 1) as f64;
            trace!(episode = k, average, "running average");
            averages.push(average);
            if let Some(pb) = pb.as_mut() {
                pb.set_postfix(format!("avg return={:.3}", average));
                pb.update(1);
            }
        }

        info!(
            agent = %self.agent.core().id,
            episodes = num_episodes,
            average_return = average,
            "training finished"
        );
        Ok(averages)
    }

    /// Replays one episode with learning disabled, stopping at termination or
    /// after `max_steps` actions (the agent's own cap if `None`). Without a
    /// callback every frame is logged through the environment's `render`.
    pub fn run_single_episode(
        &mut self,
        max_steps: Option<usize>,
        callback: Option<RenderCallback<'_>>,
    ) -> Result<f64, TaskError> {
        let max_steps: usize = max_steps.unwrap_or_else(|| self.agent.max_episode_steps());
        let was_learning: bool = self.agent.learning();
        self.agent.set_learning(false);

        let observer: Observer<'_> = match callback {
            Some(callback) => Observer::Callback(callback),
            None => Observer::Log,
        };
        let result = self.play_episode(0, max_steps, observer);

        self.agent.set_learning(was_learning);
        result
    }
}
