//! Flat table of group definitions and their leaf expansion.

use alloc::format;
use alloc::vec::Vec;
use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use super::axis::{AxisToken, GroupId};
use crate::error::{RearrangeError, RearrangeResult};

/// Leaf identifiers of an expanded group.
pub type GroupLeaves<'a> = SmallVec<[&'a str; 8]>;

/// Group definitions keyed by [`GroupId`].
///
/// Members may reference other groups. The parser only ever references groups
/// that were finalized earlier, so parsed tables are acyclic; tables built by
/// hand are checked during expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupTable {
    groups: Vec<Vec<AxisToken>>,
}

impl GroupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a group definition and returns its id.
    pub fn push(&mut self, members: Vec<AxisToken>) -> GroupId {
        let id = GroupId(self.groups.len());
        self.groups.push(members);
        id
    }

    /// Returns the members of a group.
    pub fn get(&self, id: GroupId) -> Option<&[AxisToken]> {
        self.groups.get(id.index()).map(Vec::as_slice)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterates over `(id, members)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &[AxisToken])> {
        self.groups
            .iter()
            .enumerate()
            .map(|(i, members)| (GroupId(i), members.as_slice()))
    }

    /// Expands a group into its ordered leaf identifiers.
    ///
    /// Prefer [`GroupTable::expander`] when expanding many groups of one table.
    pub fn expand(&self, id: GroupId) -> RearrangeResult<GroupLeaves<'_>> {
        self.expander().expand(id)
    }

    /// Returns a memoizing expander borrowing this table.
    pub fn expander(&self) -> GroupExpander<'_> {
        GroupExpander {
            table: self,
            memo: HashMap::new(),
        }
    }
}

/// Depth-first group expansion with a per-call memo.
pub struct GroupExpander<'a> {
    table: &'a GroupTable,
    memo: HashMap<GroupId, GroupLeaves<'a>>,
}

impl<'a> GroupExpander<'a> {
    pub fn table(&self) -> &'a GroupTable {
        self.table
    }

    /// Expands `id` into leaf identifiers, nested groups flattened in place.
    pub fn expand(&mut self, id: GroupId) -> RearrangeResult<GroupLeaves<'a>> {
        let mut visiting = HashSet::new();
        self.expand_inner(id, &mut visiting)
    }

    fn expand_inner(
        &mut self,
        id: GroupId,
        visiting: &mut HashSet<GroupId>,
    ) -> RearrangeResult<GroupLeaves<'a>> {
        if let Some(leaves) = self.memo.get(&id) {
            return Ok(leaves.clone());
        }
        if !visiting.insert(id) {
            return Err(RearrangeError::composition(format!(
                "group {id} references itself"
            )));
        }

        let table = self.table;
        let members = table
            .get(id)
            .ok_or_else(|| RearrangeError::composition(format!("unknown group {id}")))?;

        let mut leaves = GroupLeaves::new();
        for member in members {
            match member {
                AxisToken::Named(name) => leaves.push(name.as_str()),
                AxisToken::Group(inner) => {
                    let inner_leaves = self.expand_inner(*inner, visiting)?;
                    leaves.extend(inner_leaves);
                }
                AxisToken::Wildcard => {
                    return Err(RearrangeError::composition(format!(
                        "group {id} contains '...'"
                    )));
                }
            }
        }

        visiting.remove(&id);
        self.memo.insert(id, leaves.clone());
        Ok(leaves)
    }
}
