use crate::error::{Result, SpecError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Supersession
// ---------------------------------------------------------------------------

/// Version-chain links carried by every sub-item. Flattened into the item's
/// YAML so the fields sit next to `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Supersession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supersedes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superseded_at: Option<DateTime<Utc>>,
}

impl Supersession {
    pub fn is_active(&self) -> bool {
        self.superseded_by.is_none()
    }
}

// ---------------------------------------------------------------------------
// SpecItem
// ---------------------------------------------------------------------------

/// Implemented by every sub-item type (tasks, criteria, test cases, ...).
///
/// `rewrite_refs` must replace `old` with `new` anywhere the item refers to a
/// sibling by ID (e.g. a task's `depends_on`). Items with no sibling refs use
/// an empty impl.
pub trait SpecItem {
    const PREFIX: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn supersession(&self) -> &Supersession;
    fn supersession_mut(&mut self) -> &mut Supersession;
    fn rewrite_refs(&mut self, old: &str, new: &str);
}

// ---------------------------------------------------------------------------
// List operations
// ---------------------------------------------------------------------------

/// Next ID in the list: max numeric suffix + 1, e.g. `tsk-004`.
///
/// Scanning the max (not the length) makes IDs strictly increasing even when
/// items were superseded, which keeps version chains acyclic by construction.
pub fn next_id<T: SpecItem>(items: &[T]) -> String {
    let max = items
        .iter()
        .filter_map(|i| i.id().rsplit('-').next())
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("{}-{:03}", T::PREFIX, max + 1)
}

/// Append a new item, assigning the next ID. Returns the assigned ID.
pub fn push_item<T: SpecItem>(items: &mut Vec<T>, mut item: T) -> String {
    let id = next_id(items);
    item.set_id(id.clone());
    items.push(item);
    id
}

pub fn find<'a, T: SpecItem>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|i| i.id() == id)
}

pub fn find_mut<'a, T: SpecItem>(items: &'a mut [T], id: &str) -> Option<&'a mut T> {
    items.iter_mut().find(|i| i.id() == id)
}

/// Items whose version chain ends at them (no `superseded_by`).
pub fn active<T: SpecItem>(items: &[T]) -> impl Iterator<Item = &T> {
    items.iter().filter(|i| i.supersession().is_active())
}

/// Follow the `superseded_by` chain from `id` to the newest version.
///
/// Returns `None` if `id` is not in the list. A dangling link mid-chain stops
/// at the last resolvable item (the validator reports the break separately).
/// The walk is capped at the list length so a hand-edited file that forges a
/// supersession cycle cannot spin the resolver.
pub fn resolve_current<'a, T: SpecItem>(items: &'a [T], id: &str) -> Option<&'a T> {
    let mut current = find(items, id)?;
    for _ in 0..items.len() {
        match &current.supersession().superseded_by {
            Some(next_id) => match find(items, next_id) {
                Some(next) => current = next,
                None => break,
            },
            None => break,
        }
    }
    Some(current)
}

/// Replace `old_id` with `item`, preserving history.
///
/// The replacement gets the next incrementing ID; the old item is linked
/// forward (`superseded_by` + `superseded_at`), the new one back
/// (`supersedes`), and every sibling's references to `old_id` are rewritten
/// to the new ID. Errors if `old_id` is missing or already superseded: an
/// item gets at most one non-null `superseded_by`, ever.
pub fn supersede<T: SpecItem>(items: &mut Vec<T>, old_id: &str, mut item: T) -> Result<String> {
    let old = find(items, old_id).ok_or_else(|| SpecError::ItemNotFound(old_id.to_string()))?;
    if let Some(by) = &old.supersession().superseded_by {
        return Err(SpecError::AlreadySuperseded {
            id: old_id.to_string(),
            by: by.clone(),
        });
    }

    let new_id = next_id(items);
    item.set_id(new_id.clone());
    item.supersession_mut().supersedes = Some(old_id.to_string());

    let now = Utc::now();
    for existing in items.iter_mut() {
        if existing.id() == old_id {
            let s = existing.supersession_mut();
            s.superseded_by = Some(new_id.clone());
            s.superseded_at = Some(now);
        } else {
            existing.rewrite_refs(old_id, &new_id);
        }
    }

    items.push(item);
    Ok(new_id)
}

/// Rewrite helper for items that keep sibling refs in a string list.
pub fn rewrite_ref_list(refs: &mut [String], old: &str, new: &str) {
    for r in refs.iter_mut() {
        if r == old {
            *r = new.to_string();
        }
    }
}

// ---------------------------------------------------------------------------
// ItemKind
// ---------------------------------------------------------------------------

/// The kind of sub-item, used by callers that address items generically
/// (CLI and MCP tools). Each kind maps to one item-ID prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Criterion,
    Task,
    TestCase,
    Flow,
    ApiContract,
    DataModel,
    Article,
}

impl ItemKind {
    pub fn prefix(self) -> &'static str {
        match self {
            ItemKind::Criterion => "crt",
            ItemKind::Task => "tsk",
            ItemKind::TestCase => "tc",
            ItemKind::Flow => "flw",
            ItemKind::ApiContract => "api",
            ItemKind::DataModel => "dm",
            ItemKind::Article => "art",
        }
    }

    /// Infer the kind from an item ID like `tsk-003`.
    pub fn from_item_id(id: &str) -> Option<ItemKind> {
        let prefix = id.split('-').next()?;
        [
            ItemKind::Criterion,
            ItemKind::Task,
            ItemKind::TestCase,
            ItemKind::Flow,
            ItemKind::ApiContract,
            ItemKind::DataModel,
            ItemKind::Article,
        ]
        .into_iter()
        .find(|k| k.prefix() == prefix)
    }
}

impl std::str::FromStr for ItemKind {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "criterion" | "crt" => Ok(ItemKind::Criterion),
            "task" | "tsk" => Ok(ItemKind::Task),
            "test_case" | "test-case" | "tc" => Ok(ItemKind::TestCase),
            "flow" | "flw" => Ok(ItemKind::Flow),
            "api_contract" | "api-contract" | "api" => Ok(ItemKind::ApiContract),
            "data_model" | "data-model" | "dm" => Ok(ItemKind::DataModel),
            "article" | "art" => Ok(ItemKind::Article),
            _ => Err(SpecError::InvalidField {
                field: "item_kind".to_string(),
                reason: format!("unknown value '{s}'"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
