//! Enumeration engine: walk every stochastic branch of a scripted encounter.
//!
//! Each [`Node`] is one concrete turn outcome (the player's action with its
//! realized value, and the entity's reaction), carrying the absolute
//! probability of the whole path from the root. Expanding a node produces
//! every outcome of the next scripted action:
//!
//! | Next action | Children |
//! |---|---|
//! | Ball | `Caught` (catch prob, reaction prob 1); miss → `Flee` / `WatchCarefully` |
//! | Bait / Rock | one pair `Flee` / `WatchCarefully` per realized counter value (1–5 values) |
//!
//! so a node has at most 10 children. Leaves are nodes that fled, were
//! caught, ran out of script, or ran out of balls. Folding sums the absolute
//! probability of each leaf into its terminal class ([`Outcome`]); the
//! capture probability is `Outcome::caught` at the root.
//!
//! Nodes are plain values passed down the recursion. Children live only in
//! the parent's call frame, so memory is bounded by depth × 10 rather than
//! by the number of paths.
//!
//! ## Parallelism
//!
//! Nodes with `turn < parallel_depth` fan their children out over the rayon
//! pool; deeper nodes recurse on the calling thread. Child results are
//! collected in order and summed sequentially, so the result is bit-identical
//! to a fully sequential fold.

use std::fmt;
use std::io::Write;
use std::ops::Add;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::EncounterConfig;
use crate::error::{ConfigError, SolveError};
use crate::probability::Probability;
use crate::script::ActionScript;
use crate::state::InteractionState;
use crate::tables::{tables, ProbTables, StayFlee};
use crate::types::{FleeTiming, PlayerAction, Reaction};

/// Probability mass per terminal class. `caught + fled + unresolved == 1` at
/// the root.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Outcome<P> {
    pub caught: P,
    pub fled: P,
    /// Script exhausted or balls ran out with the entity still watching.
    pub unresolved: P,
}

impl<P: Probability> Outcome<P> {
    pub fn zero() -> Self {
        Outcome {
            caught: P::ZERO,
            fled: P::ZERO,
            unresolved: P::ZERO,
        }
    }

    fn leaf(node: &Node<P>) -> Self {
        let mut outcome = Self::zero();
        match node.reaction {
            Reaction::Caught => outcome.caught = node.absolute,
            Reaction::Flee => outcome.fled = node.absolute,
            Reaction::WatchCarefully => outcome.unresolved = node.absolute,
        }
        outcome
    }

    pub fn total(&self) -> P {
        self.caught + self.fled + self.unresolved
    }
}

impl<P: Probability> Add for Outcome<P> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Outcome {
            caught: self.caught + rhs.caught,
            fled: self.fled + rhs.fled,
            unresolved: self.unresolved + rhs.unresolved,
        }
    }
}

/// Result of one solve.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Solution<P> {
    pub outcome: Outcome<P>,
    /// Nodes visited, root included.
    pub explored: u64,
    pub elapsed_secs: f64,
}

impl<P: Probability> Solution<P> {
    pub fn capture_probability(&self) -> P {
        self.outcome.caught
    }
}

/// One turn outcome in the enumeration tree.
#[derive(Clone, Copy, Debug)]
pub struct Node<P> {
    /// Script actions taken to reach this node; also the index of the next one.
    pub turn: usize,
    /// `None` at the root.
    pub action: Option<PlayerAction>,
    /// Bait/rock counter before this turn's throw.
    pub counter_before: u8,
    /// Realized counter for bait/rock; 1 = caught, 0 = missed for balls.
    pub value: u8,
    pub action_prob: P,
    pub reaction: Reaction,
    pub reaction_prob: P,
    /// Product of every per-turn probability from the root down to here.
    pub absolute: P,
    /// Counters after this turn's action and reaction.
    pub state: InteractionState,
    pub balls_thrown: u32,
}

impl<P: Probability> Node<P> {
    pub fn root(state: InteractionState) -> Self {
        Node {
            turn: 0,
            action: None,
            counter_before: 0,
            value: 0,
            action_prob: P::ONE,
            reaction: Reaction::WatchCarefully,
            reaction_prob: P::ONE,
            absolute: P::ONE,
            state,
            balls_thrown: 0,
        }
    }

    fn child(
        &self,
        action: PlayerAction,
        value: u8,
        action_prob: P,
        reaction: Reaction,
        reaction_prob: P,
        state: InteractionState,
    ) -> Self {
        Node {
            turn: self.turn + 1,
            action: Some(action),
            counter_before: self.state.counter_for(action),
            value,
            action_prob,
            reaction,
            reaction_prob,
            absolute: self.absolute * action_prob * reaction_prob,
            state,
            balls_thrown: self.balls_thrown + u32::from(action == PlayerAction::Ball),
        }
    }
}

/// One trace line, e.g. `Bait0=>3 (0.199997) Watch (0.899902) B2 R0 (Abs: 0.179978)`.
impl<P: Probability> fmt::Display for Node<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(action) = self.action else {
            return f.write_str("ROOT");
        };
        match action {
            PlayerAction::Ball if self.reaction == Reaction::Caught => {
                write!(f, "Ball_Catch ({:.6})", self.action_prob)?
            }
            PlayerAction::Ball => write!(f, "Ball_Miss ({:.6})", self.action_prob)?,
            PlayerAction::Bait | PlayerAction::Rock => write!(
                f,
                "{}{}=>{} ({:.6})",
                action, self.counter_before, self.value, self.action_prob
            )?,
        }
        if self.reaction != Reaction::Caught {
            write!(f, " {} ({:.6})", self.reaction, self.reaction_prob)?;
        }
        if self.reaction == Reaction::WatchCarefully {
            write!(f, " B{} R{}", self.state.bait_counter, self.state.rock_counter)?;
        }
        write!(f, " (Abs: {:.6})", self.absolute)
    }
}

/// Exhaustive solver for one encounter configuration and script.
pub struct Solver<'a, P: Probability> {
    config: &'a EncounterConfig,
    script: &'a ActionScript,
    tables: &'static ProbTables<P>,
    parallel_depth: usize,
}

impl<'a, P: Probability> Solver<'a, P> {
    pub fn new(config: &'a EncounterConfig, script: &'a ActionScript) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Solver {
            config,
            script,
            tables: tables::<P>(),
            parallel_depth: script.len() / 2,
        })
    }

    /// Fan out over the rayon pool for nodes shallower than `depth`.
    pub fn with_parallel_depth(mut self, depth: usize) -> Self {
        self.parallel_depth = depth;
        self
    }

    pub fn sequential(self) -> Self {
        self.with_parallel_depth(0)
    }

    pub fn parallel_depth(&self) -> usize {
        self.parallel_depth
    }

    pub fn solve(&self) -> Solution<P> {
        self.solve_from(InteractionState::from_config(self.config))
    }

    /// Solve starting from an arbitrary state instead of the configured one.
    pub fn solve_from(&self, state: InteractionState) -> Solution<P> {
        self.log_start();
        let start = Instant::now();
        let explored = AtomicU64::new(0);
        let outcome = self.fold(Node::root(state), &explored);
        self.finish(outcome, explored.into_inner(), start)
    }

    /// Sequential solve that writes one line per visited node to `sink`,
    /// indented by turn.
    pub fn solve_traced(&self, sink: &mut dyn Write) -> Result<Solution<P>, SolveError> {
        self.log_start();
        let start = Instant::now();
        let mut explored = 0u64;
        let root = Node::root(InteractionState::from_config(self.config));
        let outcome = self.fold_traced(root, sink, &mut explored)?;
        sink.flush()?;
        Ok(self.finish(outcome, explored, start))
    }

    /// Every outcome of the next scripted action, or nothing for a leaf.
    pub fn children(&self, node: &Node<P>) -> Vec<Node<P>> {
        if node.reaction.is_terminal() || self.out_of_balls(node) {
            return Vec::new();
        }
        let Some(&action) = self.script.actions().get(node.turn) else {
            return Vec::new();
        };

        let mut children = Vec::with_capacity(10);
        match action {
            PlayerAction::Ball => {
                let catch_miss = node.state.catch_miss(self.tables);
                let stay_flee = node.state.stay_flee(self.tables);
                children.push(node.child(
                    action,
                    1,
                    catch_miss.catch,
                    Reaction::Caught,
                    P::ONE,
                    node.state.after_reaction(Reaction::Caught),
                ));
                push_reactions(&mut children, node, action, 0, catch_miss.miss, stay_flee, node.state);
            }
            PlayerAction::Bait | PlayerAction::Rock => {
                let counter = node.state.counter_for(action);
                for (value, prob) in self.tables.throw_outcomes(counter).iter() {
                    let thrown = node.state.after_player_action(action, value);
                    let stay_flee = match self.config.flee_timing {
                        FleeTiming::AfterThrow => thrown.stay_flee(self.tables),
                        FleeTiming::BeforeThrow => node.state.stay_flee(self.tables),
                    };
                    push_reactions(&mut children, node, action, value, prob, stay_flee, thrown);
                }
            }
        }
        children
    }

    fn out_of_balls(&self, node: &Node<P>) -> bool {
        self.config
            .ball_limit
            .is_some_and(|limit| node.balls_thrown >= limit)
    }

    fn fold(&self, node: Node<P>, explored: &AtomicU64) -> Outcome<P> {
        explored.fetch_add(1, Ordering::Relaxed);
        let children = self.children(&node);
        if children.is_empty() {
            return Outcome::leaf(&node);
        }
        if node.turn < self.parallel_depth {
            children
                .into_par_iter()
                .map(|child| self.fold(child, explored))
                .collect::<Vec<_>>()
                .into_iter()
                .fold(Outcome::zero(), Add::add)
        } else {
            children
                .into_iter()
                .map(|child| self.fold(child, explored))
                .fold(Outcome::zero(), Add::add)
        }
    }

    fn fold_traced(
        &self,
        node: Node<P>,
        sink: &mut dyn Write,
        explored: &mut u64,
    ) -> std::io::Result<Outcome<P>> {
        *explored += 1;
        writeln!(sink, "{:indent$}{}", "", node, indent = node.turn)?;
        let children = self.children(&node);
        if children.is_empty() {
            return Ok(Outcome::leaf(&node));
        }
        let mut outcome = Outcome::zero();
        for child in children {
            outcome = outcome + self.fold_traced(child, sink, explored)?;
        }
        Ok(outcome)
    }

    fn log_start(&self) {
        tracing::info!(
            script = %self.script,
            catch_rate = self.config.catch_rate,
            flee_rate = self.config.flee_rate,
            flee_timing = ?self.config.flee_timing,
            ball_limit = ?self.config.ball_limit,
            backend = P::NAME,
            parallel_depth = self.parallel_depth,
            "solving encounter"
        );
    }

    fn finish(&self, outcome: Outcome<P>, explored: u64, start: Instant) -> Solution<P> {
        let elapsed_secs = start.elapsed().as_secs_f64();
        tracing::info!(
            caught = %outcome.caught,
            fled = %outcome.fled,
            unresolved = %outcome.unresolved,
            explored,
            elapsed_secs,
            "solved encounter"
        );
        Solution {
            outcome,
            explored,
            elapsed_secs,
        }
    }
}

/// Flee and watch children of one realized player action.
fn push_reactions<P: Probability>(
    children: &mut Vec<Node<P>>,
    parent: &Node<P>,
    action: PlayerAction,
    value: u8,
    action_prob: P,
    stay_flee: StayFlee<P>,
    thrown: InteractionState,
) {
    children.push(parent.child(
        action,
        value,
        action_prob,
        Reaction::Flee,
        stay_flee.flee,
        thrown.after_reaction(Reaction::Flee),
    ));
    children.push(parent.child(
        action,
        value,
        action_prob,
        Reaction::WatchCarefully,
        stay_flee.stay,
        thrown.after_reaction(Reaction::WatchCarefully),
    ));
}

/// Capture probability of `script` under `config`, using the default
/// parallel depth.
pub fn capture_probability<P: Probability>(
    config: &EncounterConfig,
    script: &ActionScript,
) -> Result<P, SolveError> {
    Ok(Solver::<P>::new(config, script)?.solve().capture_probability())
}
