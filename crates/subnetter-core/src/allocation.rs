use crate::errors::{AllocationError, CoreError, Result};
use crate::models::{AddressBlock, BaseNetwork, StackSummary, SubBlock, SUBNET_TAG};
use log::debug;
use std::collections::BTreeSet;

/// Number of candidate blocks in a pool, third octets 1 through 254
pub const POOL_SIZE: u8 = 254;

/// Upper bound on the number of /27s a block may be divided into
pub const MAX_DIVISIONS: usize = 4;

/// Source of the stacks that currently exist.
///
/// The allocator reads allocation records back from stack tags through this
/// trait on every call. Timeouts and retries belong to the implementation.
#[allow(async_fn_in_trait)]
pub trait StackLister {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn list_active_stacks(&self) -> std::result::Result<Vec<StackSummary>, Self::Error>;
}

impl<L: StackLister + ?Sized> StackLister for &L {
    type Error = L::Error;

    async fn list_active_stacks(&self) -> std::result::Result<Vec<StackSummary>, Self::Error> {
        (**self).list_active_stacks().await
    }
}

/// The candidate blocks applications are allocated from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddressPool {
    base: BaseNetwork,
}

impl AddressPool {
    pub fn new(base: BaseNetwork) -> Self {
        Self { base }
    }

    pub fn base(&self) -> BaseNetwork {
        self.base
    }

    /// Candidates in ascending index order
    pub fn candidates(&self) -> impl Iterator<Item = AddressBlock> + '_ {
        (1..=POOL_SIZE).map(move |index| self.base.block(index))
    }

    pub fn contains(&self, block: &AddressBlock) -> bool {
        self.base.contains(block) && (1..=POOL_SIZE).contains(&block.index())
    }

    /// Lowest-numbered candidate not present in `in_use`
    pub fn first_free(&self, in_use: &BTreeSet<AddressBlock>) -> Option<AddressBlock> {
        self.candidates().find(|block| !in_use.contains(block))
    }
}

/// Collect the blocks claimed by application stacks.
///
/// Only stacks tagged `type=app` count. A `subnet` tag that is not a valid
/// block can never collide with a candidate, so it is skipped.
pub fn in_use_blocks(stacks: &[StackSummary]) -> BTreeSet<AddressBlock> {
    stacks
        .iter()
        .filter(|stack| stack.is_app())
        .filter_map(|stack| {
            let raw = stack.tags.get(SUBNET_TAG)?;
            match raw.parse::<AddressBlock>() {
                Ok(block) => Some(block),
                Err(e) => {
                    debug!("Ignoring subnet tag on stack {}: {}", stack.name, e);
                    None
                }
            }
        })
        .collect()
}

/// Picks free address blocks for new applications.
///
/// There is no locking between reading the stack list and returning a block.
/// Two concurrent calls that see the same listing get the same answer, so
/// callers needing a single winner must serialize create-and-tag themselves.
#[derive(Debug, Clone)]
pub struct Allocator<L> {
    lister: L,
    pool: AddressPool,
}

impl<L: StackLister> Allocator<L> {
    pub fn new(lister: L, pool: AddressPool) -> Self {
        Self { lister, pool }
    }

    pub fn pool(&self) -> &AddressPool {
        &self.pool
    }

    pub fn lister(&self) -> &L {
        &self.lister
    }

    /// Pool blocks currently claimed, read fresh from the lister.
    ///
    /// Blocks outside the pool (another base network, or index 0 or 255)
    /// can never be handed out, so they are left out.
    pub async fn in_use(&self) -> std::result::Result<BTreeSet<AddressBlock>, AllocationError> {
        let stacks = self
            .lister
            .list_active_stacks()
            .await
            .map_err(|e| AllocationError::QueryFailed(Box::new(e)))?;

        let in_use: BTreeSet<_> = in_use_blocks(&stacks)
            .into_iter()
            .filter(|block| self.pool.contains(block))
            .collect();
        debug!(
            "{} of {} stacks hold an address block",
            in_use.len(),
            stacks.len()
        );
        Ok(in_use)
    }

    /// The lowest-numbered block no application stack holds
    pub async fn next_available_block(&self) -> std::result::Result<AddressBlock, AllocationError> {
        let in_use = self.in_use().await?;

        self.pool
            .first_free(&in_use)
            .ok_or(AllocationError::PoolExhausted {
                base: self.pool.base(),
            })
    }
}

/// Split an application block into `count` /27 ranges starting at offset 0.
///
/// Only the fourth octet and mask change. More than [`MAX_DIVISIONS`] is an
/// error, never a truncated result.
pub fn divide_block(block: &AddressBlock, count: usize) -> Result<Vec<SubBlock>> {
    if count > MAX_DIVISIONS {
        return Err(CoreError::TooManyDivisions {
            requested: count,
            max: MAX_DIVISIONS,
        });
    }

    Ok((0..count as u8).map(|index| block.sub_block(index)).collect())
}
