//! Board model: a 24x24 grid of pegs plus four goal nodes, joined by links.
//!
//! Every position is a node in an adjacency graph. Grid cells have ids
//! `row * 24 + col`; the goal nodes follow at 576..=579. Border cells are
//! pre-linked to the goal node of their edge when the board is created.
//! These structural links live only in node adjacency. Links formed by
//! players are additionally recorded in [`Board::links`].

use crate::player::Player;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::IntoEnumIterator;
use tracing::instrument;

/// Rows and columns on the board.
pub const BOARD_SIZE: usize = 24;

/// Number of grid cells.
pub const GRID_NODES: usize = BOARD_SIZE * BOARD_SIZE;

/// Number of nodes including the four goal nodes.
pub const NODE_COUNT: usize = GRID_NODES + 4;

/// Stable identifier of a node.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(into = "u16", try_from = "u16")]
pub struct NodeId(u16);

impl From<NodeId> for u16 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// A raw node id outside `0..580`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::Error,
)]
#[display("no node with id {}", _0)]
pub struct UnknownNode(#[error(not(source))] pub u16);

impl TryFrom<u16> for NodeId {
    type Error = UnknownNode;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        NodeId::new(raw as usize).ok_or(UnknownNode(raw))
    }
}

impl NodeId {
    /// Wraps a raw id, returning `None` outside `0..580`.
    pub fn new(raw: usize) -> Option<Self> {
        (raw < NODE_COUNT).then_some(Self(raw as u16))
    }

    /// Id of the grid cell at `row`, `col`.
    pub fn grid(row: usize, col: usize) -> Option<Self> {
        Position::new(row, col).map(Position::id)
    }

    /// Index into the board's node table.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Grid position of this node, or `None` for goal nodes.
    pub fn position(self) -> Option<Position> {
        let index = self.index();
        (index < GRID_NODES).then(|| Position {
            row: index / BOARD_SIZE,
            col: index % BOARD_SIZE,
        })
    }

    /// The goal this node stands for, if it is one.
    pub fn goal(self) -> Option<Goal> {
        match self.index() {
            576 => Some(Goal::Top),
            577 => Some(Goal::Bottom),
            578 => Some(Goal::Left),
            579 => Some(Goal::Right),
            _ => None,
        }
    }

    /// Returns true for the four goal nodes.
    pub fn is_goal(self) -> bool {
        self.goal().is_some()
    }
}

/// A row/column coordinate on the grid.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("({}, {})", row, col)]
pub struct Position {
    /// Row, counted from the top edge.
    pub row: usize,
    /// Column, counted from the left edge.
    pub col: usize,
}

impl Position {
    /// Creates a position if it lies on the grid.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        (row < BOARD_SIZE && col < BOARD_SIZE).then_some(Self { row, col })
    }

    /// Node id of this position.
    pub fn id(self) -> NodeId {
        NodeId((self.row * BOARD_SIZE + self.col) as u16)
    }

    /// Position displaced by `(d_row, d_col)`, if still on the grid.
    pub fn offset(self, d_row: i32, d_col: i32) -> Option<Self> {
        let row = usize::try_from(self.row as i32 + d_row).ok()?;
        let col = usize::try_from(self.col as i32 + d_col).ok()?;
        Self::new(row, col)
    }
}

/// One of the four sentinel nodes standing for a board edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    /// Top edge, owned by player 0.
    Top,
    /// Bottom edge, owned by player 0.
    Bottom,
    /// Left edge, owned by player 1.
    Left,
    /// Right edge, owned by player 1.
    Right,
}

impl Goal {
    /// Node id of this goal.
    pub fn id(self) -> NodeId {
        match self {
            Goal::Top => NodeId(576),
            Goal::Bottom => NodeId(577),
            Goal::Left => NodeId(578),
            Goal::Right => NodeId(579),
        }
    }

    /// The player that permanently owns this goal.
    pub fn owner(self) -> Player {
        match self {
            Goal::Top | Goal::Bottom => Player::Blue,
            Goal::Left | Goal::Right => Player::Red,
        }
    }

    /// The goals a player must connect, start first.
    pub fn pair(player: Player) -> (Goal, Goal) {
        match player {
            Player::Blue => (Goal::Top, Goal::Bottom),
            Player::Red => (Goal::Left, Goal::Right),
        }
    }

    /// Grid cells along this goal's edge.
    pub fn edge(self) -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).map(move |i| match self {
            Goal::Top => Position { row: 0, col: i },
            Goal::Bottom => Position { row: BOARD_SIZE - 1, col: i },
            Goal::Left => Position { row: i, col: 0 },
            Goal::Right => Position { row: i, col: BOARD_SIZE - 1 },
        })
    }
}

/// A player-formed link between two nodes.
///
/// Links are unordered: `Link::new(a, b) == Link::new(b, a)`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(from = "RawLink")]
#[display("{}-{}", a, b)]
pub struct Link {
    a: NodeId,
    b: NodeId,
}

impl Link {
    /// Creates a link, normalising endpoint order.
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b { Self { a, b } } else { Self { a: b, b: a } }
    }

    /// Both endpoints, lower id first.
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.a, self.b)
    }

    /// Returns true if `node` is one of the endpoints.
    pub fn touches(&self, node: NodeId) -> bool {
        self.a == node || self.b == node
    }

    /// Returns true if the two links have an endpoint in common.
    pub fn shares_endpoint(&self, other: &Link) -> bool {
        other.touches(self.a) || other.touches(self.b)
    }
}

#[derive(Deserialize)]
struct RawLink {
    a: NodeId,
    b: NodeId,
}

impl From<RawLink> for Link {
    fn from(raw: RawLink) -> Self {
        Link::new(raw.a, raw.b)
    }
}

/// A node in the board graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    owner: Option<Player>,
    neighbors: BTreeSet<NodeId>,
}

impl Node {
    fn vacant(id: NodeId) -> Self {
        Self {
            id,
            owner: None,
            neighbors: BTreeSet::new(),
        }
    }

    /// Node id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Owning player, `None` for an empty grid cell.
    pub fn owner(&self) -> Option<Player> {
        self.owner
    }

    /// Ids reachable from this node over a link.
    pub fn neighbors(&self) -> &BTreeSet<NodeId> {
        &self.neighbors
    }
}

/// The full board: 580 nodes and the player-formed links between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    nodes: Vec<Node>,
    links: Vec<Link>,
}

impl Board {
    /// Creates an empty board with goal nodes owned and border cells
    /// linked to their goals.
    #[instrument]
    pub fn new() -> Self {
        let mut nodes: Vec<Node> = (0..NODE_COUNT)
            .map(|raw| Node::vacant(NodeId(raw as u16)))
            .collect();

        for goal in Goal::iter() {
            let goal_id = goal.id();
            nodes[goal_id.index()].owner = Some(goal.owner());
            for position in goal.edge() {
                let cell = position.id();
                nodes[cell.index()].neighbors.insert(goal_id);
                nodes[goal_id.index()].neighbors.insert(cell);
            }
        }

        Self {
            nodes,
            links: Vec::new(),
        }
    }

    /// Node with the given id.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Grid node at `row`, `col`; `None` off the grid.
    pub fn node_at(&self, row: usize, col: usize) -> Option<&Node> {
        NodeId::grid(row, col).map(|id| self.node(id))
    }

    /// Owner of a node.
    pub fn owner(&self, id: NodeId) -> Option<Player> {
        self.node(id).owner
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Player-formed links in the order they were made.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Returns true if a link (structural or player-formed) joins `a` and `b`.
    pub fn linked(&self, a: NodeId, b: NodeId) -> bool {
        self.node(a).neighbors.contains(&b)
    }

    /// Number of links between border cells and goal nodes.
    pub fn structural_link_count(&self) -> usize {
        Goal::iter()
            .map(|goal| self.node(goal.id()).neighbors.len())
            .sum()
    }

    /// Marks a node as owned. Ownership is never cleared.
    pub(crate) fn claim(&mut self, id: NodeId, player: Player) {
        self.nodes[id.index()].owner = Some(player);
    }

    /// Merges links into the graph without checking legality.
    ///
    /// Each link's endpoints become neighbors of one another and the link
    /// is appended to [`Board::links`].
    #[instrument(skip(self, links))]
    pub fn add_links(mut self, links: impl IntoIterator<Item = Link>) -> Self {
        for link in links {
            let (a, b) = link.endpoints();
            self.nodes[a.index()].neighbors.insert(b);
            self.nodes[b.index()].neighbors.insert(a);
            self.links.push(link);
        }
        self
    }

    /// Plain-text dump of the grid: `.` empty, `0`/`1` owned.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(GRID_NODES + BOARD_SIZE);
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let symbol = match self.nodes[row * BOARD_SIZE + col].owner {
                    None => '.',
                    Some(Player::Blue) => '0',
                    Some(Player::Red) => '1',
                };
                out.push(symbol);
            }
            out.push('\n');
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Board as received off the wire, before shape checks.
#[derive(Deserialize)]
struct RawBoard {
    nodes: Vec<Node>,
    #[serde(default)]
    links: Vec<Link>,
}

/// A deserialized board that does not have the fixed TwixT shape.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum BoardShapeError {
    /// Wrong number of nodes.
    #[display("expected {} nodes, found {}", NODE_COUNT, _0)]
    NodeCount(usize),
    /// A node is stored at an index that does not match its id.
    #[display("node {} stored at index {}", id, index)]
    Misplaced {
        /// Slot in the node table.
        index: usize,
        /// Id found in that slot.
        id: NodeId,
    },
    /// A goal node is not owned by its fixed player.
    #[display("goal node {} has the wrong owner", _0)]
    GoalOwner(NodeId),
    /// A node lists itself as a neighbor.
    #[display("node {} is linked to itself", _0)]
    SelfLink(NodeId),
}

impl std::error::Error for BoardShapeError {}

impl TryFrom<RawBoard> for Board {
    type Error = BoardShapeError;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        if raw.nodes.len() != NODE_COUNT {
            return Err(BoardShapeError::NodeCount(raw.nodes.len()));
        }
        for (index, node) in raw.nodes.iter().enumerate() {
            if node.id.index() != index {
                return Err(BoardShapeError::Misplaced { index, id: node.id });
            }
            if let Some(goal) = node.id.goal()
                && node.owner != Some(goal.owner())
            {
                return Err(BoardShapeError::GoalOwner(node.id));
            }
            if node.neighbors.contains(&node.id) {
                return Err(BoardShapeError::SelfLink(node.id));
            }
        }
        Ok(Self {
            nodes: raw.nodes,
            links: raw.links,
        })
    }
}
