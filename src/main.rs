use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tabular_rl::agent::{AgentKind, AgentVariant};
use tabular_rl::config::{AgentConfig, TaskConfig};
use tabular_rl::env::{
    grid_to_string, Env, GridWorldEnv, Info, LavaRoomConfig, LavaRoomEnv, Layout, Observation,
};
use tabular_rl::error::{ConfigError, TaskError};
use tabular_rl::plot::plot_average_returns;
use tabular_rl::task::{RenderCallback, RlTask};

/// Train tabular RL agents on a grid environment and compare their running-average returns
#[derive(StructOpt, Debug)]
#[structopt(name = "tabular_rl")]
struct Cli {
    /// Environment to train on
    #[structopt(long = "env", default_value = "grid", possible_values = &["grid", "cliff", "lava"])]
    env: String,

    /// Comma separated agents (random, fixed, mc, sarsa, q, dyna-q) or "all"
    #[structopt(long = "agents", default_value = "all")]
    agents: String,

    /// Number of episodes for the training
    #[structopt(long = "n_episodes", short = "n", default_value = "500")]
    n_episodes: usize,

    /// Maximum number of steps per episode
    #[structopt(long = "max_steps", default_value = "100")]
    max_steps: usize,

    /// Rows of the goal-finding grid
    #[structopt(long = "rows", default_value = "5")]
    rows: usize,

    /// Columns of the goal-finding grid
    #[structopt(long = "cols", default_value = "5")]
    cols: usize,

    /// Learning rate of the RL agents
    #[structopt(long = "learning_rate", default_value = "0.1")]
    learning_rate: f64,

    /// Discount factor used on the returns and the temporal difference targets
    #[structopt(long = "discount_factor", default_value = "1.0")]
    discount_factor: f64,

    /// Initial value for the exploration ratio
    #[structopt(long = "initial_epsilon", default_value = "0.1")]
    initial_epsilon: f64,

    /// Multiplicative decay of the exploration ratio after each episode
    #[structopt(long = "epsilon_decay", default_value = "1.0")]
    epsilon_decay: f64,

    /// Final value for the exploration ratio
    #[structopt(long = "final_epsilon", default_value = "0.0")]
    final_epsilon: f64,

    /// Simulated updates per real step of the Dyna-Q agent
    #[structopt(long = "planning_steps", default_value = "10")]
    planning_steps: usize,

    /// Seed of the agents' random sources
    #[structopt(long = "seed")]
    seed: Option<u64>,

    /// Write a chart of the running-average returns to this PNG file
    #[structopt(long = "plot", parse(from_os_str))]
    plot: Option<PathBuf>,

    /// Show a progress bar while training
    #[structopt(long = "progress")]
    progress: bool,

    /// Show example of episode
    #[structopt(long = "show_example")]
    show_example: bool,
}

impl Cli {
    fn agent_config(&self, variant: AgentVariant) -> AgentConfig {
        AgentConfig {
            max_episode_steps: self.max_steps,
            alpha: self.learning_rate,
            gamma: self.discount_factor,
            epsilon: self.initial_epsilon,
            epsilon_decay: self.epsilon_decay,
            final_epsilon: self.final_epsilon,
            num_planning_steps: self.planning_steps,
            seed: self.seed,
            ..AgentConfig::with_id(format!("{:?}", variant))
        }
    }

    fn variants(&self) -> Result<Vec<AgentVariant>, ConfigError> {
        if self.agents.trim() == "all" {
            return Ok(AgentVariant::ALL.to_vec());
        }
        self.agents
            .split(',')
            .map(|name| name.trim().parse::<AgentVariant>())
            .collect()
    }
}


fn train<E, F>(
    cli: &Cli,
    variants: &[AgentVariant],
    make_env: F,
) -> Result<Vec<(String, Vec<f64>)>, TaskError>
where
    E: Env,
    F: Fn() -> Result<E, ConfigError>,
{
    let mut series: Vec<(String, Vec<f64>)> = vec![];
    for &variant in variants {
        let env: E = make_env()?;
        let agent: AgentKind = variant.build(&cli.agent_config(variant), env.action_space())?;
        let name: String = agent.to_string();
        let config = TaskConfig {
            show_progress: cli.progress,
        };
        let mut task = RlTask::with_config(env, agent, config);

        let now: Instant = Instant::now();
        let averages: Vec<f64> = task.run_episodes(cli.n_episodes)?;
        let elapsed: std::time::Duration = now.elapsed();
        info!(
            agent = %name,
            elapsed = ?elapsed,
            final_average = averages.last().copied().unwrap_or(0.0),
            "trained"
        );

        if cli.show_example {
            println!("{}", name);
            let mut t: usize = 0;
            let mut print_frame = |observation: &Observation, info: &Info| {
                println!("Step {}:", t);
                println!("{}", grid_to_string(&observation.chars));
                println!("status {:?}", info.end_status);
                t += 1;
            };
            let callback: RenderCallback<'_> = &mut print_frame;
            let episode_return: f64 = task.run_single_episode(None, Some(callback))?;
            println!("episode return {:?}", episode_return);
        }
        series.push((name, averages));
    }
    Ok(series)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli: Cli = Cli::from_args();
    let variants: Vec<AgentVariant> = cli.variants()?;

    let (title, series) = match cli.env.as_str() {
        "cliff" | "lava" => {
            let (title, layout) = match cli.env.as_str() {
                "cliff" => ("Cliff walking", Layout::CLIFF),
                _ => ("Room with lava", Layout::ROOM_WITH_LAVA),
            };
            let env_config = LavaRoomConfig {
                max_episode_steps: cli.max_steps,
                ..LavaRoomConfig::default()
            };
            let series = train(&cli, &variants, || {
                Ok(LavaRoomEnv::new(layout, env_config.clone()))
            })?;
            (title, series)
        }
        _ => {
            let series = train(&cli, &variants, || GridWorldEnv::new(cli.rows, cli.cols, "human"))?;
            ("Goal finding", series)
        }
    };

    if let Some(path) = &cli.plot {
        plot_average_returns(path, title, &series)?;
        info!(path = %path.display(), "chart written");
    }
    Ok(())
}
