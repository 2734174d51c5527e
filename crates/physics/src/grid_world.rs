//! Small deterministic maze with discrete moves.
//!
//! An 8x8 grid surrounded by walls, with a handful of interior walls and a
//! single goal cell. The agent moves one cell per step in the chosen direction
//! unless a wall is in the way; entering the goal ends the episode. Rewards
//! favor short paths: `1 - 0.9 * step_count / max_steps` on success, 0
//! otherwise. Episode truncation is left to a step-limit wrapper.
//!
//! Nothing in the dynamics is random, so reset seeds are accepted and ignored.

use fastrand::Rng;
use render::canvas::{BLACK, GREY};
use render::{Canvas, Frame, RenderMode};
use serde::{Deserialize, Serialize};

use crate::env::{present, Environment, Info, ResetOptions, Step};
use crate::error::{require_len, EnvError};
use crate::space::{Discrete, Space};

const SIZE: usize = 8;
const TILE_PIXELS: u32 = 32;
const INTERIOR_WALLS: [(usize, usize); 7] = [(5, 1), (1, 2), (3, 2), (6, 3), (2, 4), (4, 4), (4, 6)];
const GOAL: Cell = Cell { x: 1, y: SIZE / 2 };
const START: Cell = Cell { x: SIZE - 2, y: SIZE - 2 };

/// Grid coordinates; `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum GridAction {
    Right = 0,
    Down = 1,
    Left = 2,
    Up = 3,
}

impl GridAction {
    pub const ALL: [GridAction; 4] = [GridAction::Right, GridAction::Down, GridAction::Left, GridAction::Up];

    /// Target of a move from `cell`, or `None` when it would leave the grid.
    fn apply(self, cell: Cell) -> Option<Cell> {
        let Cell { x, y } = cell;
        match self {
            GridAction::Right => Some(Cell::new(x + 1, y)),
            GridAction::Down => Some(Cell::new(x, y + 1)),
            GridAction::Left => x.checked_sub(1).map(|x| Cell::new(x, y)),
            GridAction::Up => y.checked_sub(1).map(|y| Cell::new(x, y)),
        }
    }
}

impl TryFrom<u8> for GridAction {
    type Error = EnvError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        GridAction::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| EnvError::InvalidAction(format!("unknown grid action {value}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Wall,
    Goal,
}

/// All cells of a `width` x `height` grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSpace {
    pub width: usize,
    pub height: usize,
}

impl Space for GridSpace {
    type Element = Cell;

    fn sample(&self, rng: &mut Rng) -> Cell {
        Cell::new(rng.usize(..self.width), rng.usize(..self.height))
    }

    fn contains(&self, cell: &Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridWorldConfig {
    /// Step budget used to scale the success reward.
    pub max_steps: usize,
}

impl Default for GridWorldConfig {
    fn default() -> Self {
        Self { max_steps: 4 * SIZE * SIZE }
    }
}

/// The grid world system.
pub struct GridWorldEnv {
    config: GridWorldConfig,
    tiles: Vec<Tile>,
    observation_space: GridSpace,
    action_space: Discrete<GridAction>,
    render_mode: Option<RenderMode>,
    agent: Option<Cell>,
    direction: GridAction,
    step_count: usize,
}

impl GridWorldEnv {
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidConfiguration`] for a zero step budget.
    pub fn new(config: GridWorldConfig, render_mode: Option<RenderMode>) -> Result<Self, EnvError> {
        if config.max_steps == 0 {
            return Err(EnvError::InvalidConfiguration(
                "grid world max_steps must be positive".to_string(),
            ));
        }
        let mut tiles = vec![Tile::Empty; SIZE * SIZE];
        for i in 0..SIZE {
            for (x, y) in [(i, 0), (i, SIZE - 1), (0, i), (SIZE - 1, i)] {
                tiles[y * SIZE + x] = Tile::Wall;
            }
        }
        for (x, y) in INTERIOR_WALLS {
            tiles[y * SIZE + x] = Tile::Wall;
        }
        tiles[GOAL.y * SIZE + GOAL.x] = Tile::Goal;

        Ok(Self {
            config,
            tiles,
            observation_space: GridSpace { width: SIZE, height: SIZE },
            action_space: Discrete::new(GridAction::ALL.to_vec())?,
            render_mode,
            agent: None,
            direction: GridAction::Left,
            step_count: 0,
        })
    }

    #[must_use]
    pub fn tile(&self, cell: Cell) -> Option<Tile> {
        self.observation_space
            .contains(&cell)
            .then(|| self.tiles[cell.y * SIZE + cell.x])
    }

    #[must_use]
    pub fn start(&self) -> Cell {
        START
    }

    #[must_use]
    pub fn goal(&self) -> Cell {
        GOAL
    }

    #[must_use]
    pub fn agent(&self) -> Option<Cell> {
        self.agent
    }

    fn success_reward(&self) -> f64 {
        1.0 - 0.9 * (self.step_count as f64 / self.config.max_steps as f64)
    }

    fn draw(&self, agent: Cell) -> Canvas {
        let tile = f64::from(TILE_PIXELS);
        let side = TILE_PIXELS * SIZE as u32;
        let mut canvas = Canvas::new(side, side);
        canvas.fill(BLACK);
        // Canvas rows grow upwards, grid rows downwards.
        let corner = |cell: Cell| (cell.x as f64 * tile, (SIZE - 1 - cell.y) as f64 * tile);

        for y in 0..SIZE {
            for x in 0..SIZE {
                let cell = Cell::new(x, y);
                let color = match self.tiles[y * SIZE + x] {
                    Tile::Empty => continue,
                    Tile::Wall => [100, 100, 100],
                    Tile::Goal => [0, 255, 0],
                };
                let (left, bottom) = corner(cell);
                canvas.fill_rect((left, bottom), (left + tile, bottom + tile), color);
            }
        }
        for i in 0..=SIZE {
            let at = i as f64 * tile;
            canvas.draw_line((at, 0.0), (at, f64::from(side)), 1.0, GREY);
            canvas.draw_line((0.0, at), (f64::from(side), at), 1.0, GREY);
        }

        let (left, bottom) = corner(agent);
        let (cx, cy) = (left + tile / 2.0, bottom + tile / 2.0);
        let r = tile * 0.35;
        let (dx, dy) = match self.direction {
            GridAction::Right => (1.0, 0.0),
            GridAction::Down => (0.0, -1.0),
            GridAction::Left => (-1.0, 0.0),
            GridAction::Up => (0.0, 1.0),
        };
        canvas.fill_polygon(
            &[
                (cx + dx * r, cy + dy * r),
                (cx - dx * r - dy * r, cy - dy * r + dx * r),
                (cx - dx * r + dy * r, cy - dy * r - dx * r),
            ],
            [255, 0, 0],
        );
        canvas
    }
}

impl Environment for GridWorldEnv {
    type Observation = Cell;
    type Action = GridAction;
    type ObservationSpace = GridSpace;
    type ActionSpace = Discrete<GridAction>;

    fn observation_space(&self) -> &GridSpace {
        &self.observation_space
    }

    fn action_space(&self) -> &Discrete<GridAction> {
        &self.action_space
    }

    fn reset(&mut self, _seed: Option<u64>, options: Option<&ResetOptions>) -> Result<(Cell, Info), EnvError> {
        let agent = match options.and_then(|o| o.state.as_deref()) {
            None => START,
            Some(state) => {
                require_len(2, state.len())?;
                let cell = Cell::new(state[0] as usize, state[1] as usize);
                if self.tile(cell) != Some(Tile::Empty) {
                    return Err(EnvError::InvalidConfiguration(format!(
                        "agent cannot start on {cell:?}"
                    )));
                }
                cell
            }
        };
        self.agent = Some(agent);
        self.direction = GridAction::Left;
        self.step_count = 0;
        tracing::debug!(?agent, "grid world reset");
        if self.render_mode == Some(RenderMode::Human) {
            self.render()?;
        }
        Ok((agent, Info::new()))
    }

    fn step(&mut self, action: &GridAction) -> Result<Step<Cell>, EnvError> {
        let agent = self.agent.ok_or(EnvError::InvalidLifecycle("call reset before step"))?;
        self.step_count += 1;
        self.direction = *action;

        let target = action.apply(agent).and_then(|cell| self.tile(cell).map(|t| (cell, t)));
        let (agent, terminated) = match target {
            Some((cell, Tile::Empty)) => (cell, false),
            Some((cell, Tile::Goal)) => (cell, true),
            Some((_, Tile::Wall)) | None => (agent, false),
        };
        let reward = if terminated { self.success_reward() } else { 0.0 };

        self.agent = Some(agent);
        tracing::trace!(?agent, ?action, "grid world step");
        if self.render_mode == Some(RenderMode::Human) {
            self.render()?;
        }
        Ok(Step {
            observation: agent,
            reward,
            terminated,
            truncated: false,
            info: Info::new(),
        })
    }

    fn render(&mut self) -> Result<Vec<Frame>, EnvError> {
        let agent = self.agent.ok_or(EnvError::InvalidLifecycle("call reset before render"))?;
        present(self.render_mode, || self.draw(agent))
    }

    fn render_mode(&self) -> Option<RenderMode> {
        self.render_mode
    }
}
