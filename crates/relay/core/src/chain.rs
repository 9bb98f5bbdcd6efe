//! Header linkage and heaviest-chain selection.

use crate::{Anchor, ChainError, RelayConfig};
use alloy_primitives::{
    B256,
    map::{B256HashMap, B256HashSet},
};
use btcrelay_primitives::BlockHeader;
use btcrelay_storage::BlockStore;
use derive_more::Display;
use std::{
    collections::VecDeque,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use tracing::{debug, info, trace, warn};

/// Position of a stored block relative to the anchor and the heaviest tip.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum BlockStatus {
    /// The parent chain does not reach the anchor yet.
    #[display("unlinked")]
    Unlinked,
    /// Reachable from the anchor but not the heaviest tip.
    #[display("linked")]
    Linked,
    /// The tip of the heaviest chain.
    #[display("heaviest")]
    Heaviest,
}

/// The effect of recording a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The block was already stored. Nothing changed.
    Duplicate,
    /// Stored, but the parent is not linked to the anchor yet.
    Unlinked,
    /// Linked at `height` without overtaking the heaviest chain.
    Linked {
        /// Absolute height of the recorded block.
        height: u64,
    },
    /// Linking the block moved the heaviest tip.
    ///
    /// `head` is the recorded block itself, or one of its previously unlinked descendants.
    NewHead {
        /// The new heaviest block.
        head: B256,
        /// Absolute height of the new heaviest block.
        height: u64,
        /// Number of blocks of the previous main chain that were abandoned, zero for a plain
        /// extension. `None` if the fork point lies beyond the traversal limit.
        reorg_depth: Option<u64>,
    },
}

/// A block's relation to the main chain, resolved under a single lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    /// No header is stored under the hash.
    Unknown,
    /// Stored, but not an ancestor of the heaviest tip.
    OffMainChain,
    /// An ancestor of (or equal to) the heaviest tip.
    OnMainChain {
        /// The block's header.
        header: BlockHeader,
        /// Number of blocks built on top of it.
        confirmations: u64,
    },
}

#[derive(Debug)]
struct ChainState {
    heaviest: B256,
    heaviest_height: u64,
    /// Absolute height of every block linked to the anchor.
    heights: B256HashMap<u64>,
    /// Stored blocks waiting for their parent to be linked, keyed by parent hash.
    pending: B256HashMap<Vec<B256>>,
    /// Every block currently waiting in `pending`.
    unlinked: B256HashSet,
}

impl ChainState {
    fn is_tracked(&self, block_hash: &B256) -> bool {
        self.heights.contains_key(block_hash) || self.unlinked.contains(block_hash)
    }
}

/// Tracks the heaviest known chain of headers rooted at a trusted [`Anchor`].
///
/// Chain length is the fork-choice metric: a block becomes the heaviest tip only when its
/// height is strictly greater than the current tip's, so the first block seen at a given
/// height wins ties. All mutation happens under one write lock.
#[derive(Debug)]
pub struct ChainTracker<S> {
    store: S,
    anchor: Anchor,
    config: RelayConfig,
    state: RwLock<ChainState>,
}

impl<S> ChainTracker<S>
where
    S: BlockStore,
{
    /// Creates a tracker whose heaviest block is `anchor`, storing the anchor header.
    ///
    /// The store may already hold headers from an earlier tracker. They are not linked until
    /// they are submitted again, at which point the stored header is used.
    pub fn new(store: S, anchor: Anchor, config: RelayConfig) -> Result<Self, ChainError> {
        store.put(anchor.hash, anchor.header)?;

        let mut heights = B256HashMap::default();
        heights.insert(anchor.hash, anchor.height);
        let state = ChainState {
            heaviest: anchor.hash,
            heaviest_height: anchor.height,
            heights,
            pending: B256HashMap::default(),
            unlinked: B256HashSet::default(),
        };

        #[cfg(feature = "metrics")]
        crate::Metrics::record_heaviest(anchor.height);

        info!(
            target: "chain_tracker",
            anchor = %anchor.hash,
            height = anchor.height,
            "Initialized chain tracker"
        );

        Ok(Self { store, anchor, config, state: RwLock::new(state) })
    }

    /// Returns the anchor the tracker was bootstrapped from.
    pub const fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    /// Returns the tracker configuration.
    pub const fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Returns the underlying block store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Stores a header and applies the fork-choice rule.
    ///
    /// Linking a block also links every stored descendant that was waiting on it, so headers
    /// may arrive in any order.
    pub fn record_header(
        &self,
        block_hash: B256,
        header: BlockHeader,
    ) -> Result<RecordOutcome, ChainError> {
        let outcome = self.link_header(block_hash, header)?;
        #[cfg(feature = "metrics")]
        crate::Metrics::record_header(&outcome);
        Ok(outcome)
    }

    fn link_header(
        &self,
        block_hash: B256,
        header: BlockHeader,
    ) -> Result<RecordOutcome, ChainError> {
        let mut state = self.write_state()?;

        if state.is_tracked(&block_hash) {
            debug!(target: "chain_tracker", %block_hash, "Ignoring duplicate header");
            return Ok(RecordOutcome::Duplicate);
        }

        let header = if self.store.has(block_hash)? {
            debug!(target: "chain_tracker", %block_hash, "Tracking previously stored header");
            self.store.get(block_hash)?
        } else {
            self.store.put(block_hash, header)?;
            header
        };

        let Some(&parent_height) = state.heights.get(&header.prev_block) else {
            debug!(
                target: "chain_tracker",
                %block_hash,
                prev_block = %header.prev_block,
                "Stored header with unlinked parent"
            );
            state.pending.entry(header.prev_block).or_default().push(block_hash);
            state.unlinked.insert(block_hash);
            return Ok(RecordOutcome::Unlinked);
        };

        let height = parent_height + 1;
        let mut best: Option<(B256, u64)> = None;
        let mut queue = VecDeque::from([(block_hash, height)]);
        while let Some((hash, hash_height)) = queue.pop_front() {
            state.heights.insert(hash, hash_height);
            state.unlinked.remove(&hash);
            trace!(target: "chain_tracker", %hash, height = hash_height, "Linked block");

            let best_height = best.map_or(state.heaviest_height, |(_, h)| h);
            if hash_height > best_height {
                best = Some((hash, hash_height));
            }

            if let Some(children) = state.pending.remove(&hash) {
                queue.extend(children.into_iter().map(|child| (child, hash_height + 1)));
            }
        }

        Ok(match best {
            Some((head, head_height)) => {
                let previous = state.heaviest;
                let reorg_depth = self.reorg_depth(&state, previous, head);
                state.heaviest = head;
                state.heaviest_height = head_height;

                match reorg_depth {
                    Some(0) => debug!(
                        target: "chain_tracker",
                        %head,
                        height = head_height,
                        "Extended heaviest chain"
                    ),
                    Some(depth) => info!(
                        target: "chain_tracker",
                        %previous,
                        %head,
                        height = head_height,
                        depth,
                        "Reorganized heaviest chain"
                    ),
                    None => warn!(
                        target: "chain_tracker",
                        %previous,
                        %head,
                        height = head_height,
                        "Heaviest chain moved, fork point beyond traversal limit"
                    ),
                }

                RecordOutcome::NewHead { head, height: head_height, reorg_depth }
            }
            None => {
                debug!(
                    target: "chain_tracker",
                    %block_hash,
                    height,
                    "Linked header off the heaviest tip"
                );
                RecordOutcome::Linked { height }
            }
        })
    }

    /// Returns `true` iff `block_hash` is the heaviest block or one of its ancestors down to
    /// and including the anchor.
    ///
    /// Fails closed: unknown blocks, storage failures and walks that exceed the traversal
    /// limit all yield `false`.
    pub fn is_on_heaviest_chain(&self, block_hash: B256) -> bool {
        self.find_on_heaviest_chain(block_hash).unwrap_or_else(|err| {
            warn!(target: "chain_tracker", %block_hash, %err, "Treating block as off the main chain");
            false
        })
    }

    /// Walks from the heaviest block towards the anchor looking for `block_hash`.
    ///
    /// Unlike [`Self::is_on_heaviest_chain`], walk failures are surfaced.
    pub fn find_on_heaviest_chain(&self, block_hash: B256) -> Result<bool, ChainError> {
        let state = self.read_state()?;
        self.walk_to(&state, block_hash)
    }

    /// Resolves a block's header and main-chain position under a single read lock.
    pub fn membership(&self, block_hash: B256) -> Result<Membership, ChainError> {
        let state = self.read_state()?;

        if !self.store.has(block_hash)? {
            return Ok(Membership::Unknown);
        }
        let header = self.store.get(block_hash)?;

        match self.walk_to(&state, block_hash) {
            Ok(true) => {}
            Ok(false) => return Ok(Membership::OffMainChain),
            Err(err) => {
                warn!(target: "chain_tracker", %block_hash, %err, "Treating block as off the main chain");
                return Ok(Membership::OffMainChain);
            }
        }

        let confirmations = state
            .heights
            .get(&block_hash)
            .map_or(0, |height| state.heaviest_height.saturating_sub(*height));
        Ok(Membership::OnMainChain { header, confirmations })
    }

    /// Returns the block's position in the chain, or `None` if it was never stored.
    pub fn status(&self, block_hash: B256) -> Result<Option<BlockStatus>, ChainError> {
        let state = self.read_state()?;
        if state.heaviest == block_hash {
            return Ok(Some(BlockStatus::Heaviest));
        }
        if state.heights.contains_key(&block_hash) {
            return Ok(Some(BlockStatus::Linked));
        }
        Ok(self.store.has(block_hash)?.then_some(BlockStatus::Unlinked))
    }

    /// Returns the current heaviest block hash.
    pub fn heaviest_block(&self) -> Result<B256, ChainError> {
        Ok(self.read_state()?.heaviest)
    }

    /// Returns the absolute height of the heaviest block.
    pub fn chain_height(&self) -> Result<u64, ChainError> {
        Ok(self.read_state()?.heaviest_height)
    }

    /// Returns the absolute height of a linked block.
    pub fn height_of(&self, block_hash: B256) -> Result<Option<u64>, ChainError> {
        Ok(self.read_state()?.heights.get(&block_hash).copied())
    }

    /// Returns the number of blocks built on top of `block_hash`, if it is on the main chain.
    pub fn confirmations(&self, block_hash: B256) -> Result<Option<u64>, ChainError> {
        Ok(match self.membership(block_hash)? {
            Membership::OnMainChain { confirmations, .. } => Some(confirmations),
            _ => None,
        })
    }

    fn walk_to(&self, state: &ChainState, block_hash: B256) -> Result<bool, ChainError> {
        let limit = self.config.max_traversal_depth;
        let mut current = state.heaviest;
        let mut steps = 0usize;

        loop {
            if current == block_hash {
                trace!(target: "chain_tracker", %block_hash, steps, "Found block on heaviest chain");
                return Ok(true);
            }
            if current == self.anchor.hash {
                return Ok(false);
            }
            if steps >= limit {
                return Err(ChainError::TraversalLimitExceeded { limit });
            }
            current = self.store.get(current)?.prev_block;
            steps += 1;
        }
    }

    /// Counts the blocks of `old_head`'s chain that are not ancestors of `new_head`.
    fn reorg_depth(&self, state: &ChainState, old_head: B256, new_head: B256) -> Option<u64> {
        let height = |hash: &B256| state.heights.get(hash).copied();
        let mut budget = self.config.max_traversal_depth;
        let mut step = |hash: B256| -> Option<B256> {
            budget = budget.checked_sub(1)?;
            self.store.get(hash).ok().map(|header| header.prev_block)
        };

        let (mut old, mut old_height) = (old_head, height(&old_head)?);
        let (mut new, mut new_height) = (new_head, height(&new_head)?);
        let mut depth = 0u64;

        while new_height > old_height {
            new = step(new)?;
            new_height -= 1;
        }
        while old_height > new_height {
            old = step(old)?;
            old_height -= 1;
            depth += 1;
        }
        while old != new {
            old = step(old)?;
            new = step(new)?;
            depth += 1;
        }

        Some(depth)
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, ChainState>, ChainError> {
        self.state.read().map_err(|_| ChainError::LockPoisoned)
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, ChainState>, ChainError> {
        self.state.write().map_err(|_| ChainError::LockPoisoned)
    }
}
