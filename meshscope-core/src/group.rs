// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Group assignment and precedence
//!
//! Every place that sets a node's group goes through this module. The rule is
//! that the first authoritative group (supplied by the record producer) sticks:
//! neither a later supplied group nor one guessed from the identifier's syntax
//! replaces it.

use crate::model::Group;

/// Separators accepted between the group and the leaf of an identifier
pub const GROUP_SEPARATORS: [char; 2] = ['.', ':'];

/// Infer a group from an identifier shaped like `<group><sep><leaf>`.
///
/// Splits at the first separator. Both halves must be non-empty.
pub fn infer_group(id: &str) -> Option<String> {
    let idx = id.find(|c| GROUP_SEPARATORS.contains(&c))?;
    let (group, rest) = id.split_at(idx);
    let leaf = &rest[1..];
    if group.trim().is_empty() || leaf.trim().is_empty() {
        return None;
    }
    Some(group.to_string())
}

/// Authoritative beats inferred. An existing authoritative group is never
/// replaced.
fn prefer(current: Option<&Group>, candidate: Option<&Group>) -> Option<Group> {
    match (current, candidate) {
        (Some(c), _) if c.is_authoritative() => Some(c.clone()),
        (_, Some(n)) if n.is_authoritative() => Some(n.clone()),
        (Some(c), _) => Some(c.clone()),
        (None, n) => n.cloned(),
    }
}

/// Decide a node's group when a record mentions it.
///
/// `current` is the node's existing assignment (if the node exists) and
/// `supplied` the group carried by the record.
pub fn resolve_group(current: Option<&Group>, supplied: Option<&str>, id: &str) -> Option<Group> {
    let supplied = supplied
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Group::authoritative);
    prefer(current, supplied.as_ref()).or_else(|| infer_group(id).map(Group::inferred))
}

/// Combine the group of a node present in two graphs being merged.
///
/// Same rule as [`resolve_group`], so merging batches one by one assigns the
/// groups a single aggregation over all of them would.
pub fn merge_group(existing: Option<&Group>, incoming: Option<&Group>) -> Option<Group> {
    prefer(existing, incoming)
}
