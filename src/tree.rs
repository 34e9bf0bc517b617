//! Category Tree Utilities
//!
//! Builds the nested category hierarchy from the flat backend list,
//! flattens it back, resolves root-to-leaf id chains and checks the
//! integrity of a fetched snapshot.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Category, ProductCategoryLink, MAX_DEPTH};

/// Category with its nested children.
/// Leaves carry an empty `children` vector, never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTreeItem {
    #[serde(flatten)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CategoryTreeItem>,
}

impl CategoryTreeItem {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("category {id} references missing parent {parent_id}")]
    DanglingParent { id: u32, parent_id: u32 },

    #[error("parent chain of category {id} exceeds {max_depth} levels")]
    ChainTooDeep { id: u32, max_depth: u8 },

    #[error("category {id} has level {level} but sits at depth {depth}")]
    LevelMismatch { id: u32, level: u8, depth: usize },
}

pub fn build_tree(records: &[Category]) -> Vec<CategoryTreeItem> {
    build_tree_with_depth(records, MAX_DEPTH)
}

/// Nest `records` down to `max_depth` levels.
/// Roots are the level-1 records; a child sits exactly one level below
/// its parent. Input order is kept among siblings. Records that fit
/// nowhere are left out.
pub fn build_tree_with_depth(records: &[Category], max_depth: u8) -> Vec<CategoryTreeItem> {
    let mut by_parent: HashMap<u32, Vec<&Category>> = HashMap::new();
    for record in records {
        if let Some(parent_id) = record.parent_id {
            by_parent.entry(parent_id).or_default().push(record);
        }
    }

    fn attach(
        category: &Category,
        max_depth: u8,
        by_parent: &HashMap<u32, Vec<&Category>>,
    ) -> CategoryTreeItem {
        let children = if category.level < max_depth {
            by_parent
                .get(&category.id)
                .map(|kids| {
                    kids.iter()
                        .filter(|kid| kid.level == category.level + 1)
                        .map(|kid| attach(kid, max_depth, by_parent))
                        .collect()
                })
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        CategoryTreeItem { category: category.clone(), children }
    }

    if max_depth == 0 {
        return Vec::new();
    }
    records
        .iter()
        .filter(|record| record.level == 1)
        .map(|root| attach(root, max_depth, &by_parent))
        .collect()
}

/// Pre-order list of every node, children stripped
pub fn flatten(tree: &[CategoryTreeItem]) -> Vec<Category> {
    fn collect(nodes: &[CategoryTreeItem], out: &mut Vec<Category>) {
        for node in nodes {
            out.push(node.category.clone());
            collect(&node.children, out);
        }
    }

    let mut out = Vec::new();
    collect(tree, &mut out);
    out
}

/// Root-first ids from the top ancestor down to `selected_id`.
/// An id not in the tree resolves to an empty chain.
pub fn resolve_chain(selected_id: u32, tree: &[CategoryTreeItem]) -> Result<Vec<u32>, TreeError> {
    resolve_chain_in(selected_id, &flatten(tree))
}

/// Same walk over a flat record list
pub fn resolve_chain_in(selected_id: u32, records: &[Category]) -> Result<Vec<u32>, TreeError> {
    let by_id: HashMap<u32, &Category> = records.iter().map(|c| (c.id, c)).collect();
    let Some(leaf) = by_id.get(&selected_id) else {
        return Ok(Vec::new());
    };

    let mut chain = vec![leaf.id];
    let mut current = *leaf;
    while let Some(parent_id) = current.parent_id {
        if chain.len() >= MAX_DEPTH as usize {
            return Err(TreeError::ChainTooDeep { id: selected_id, max_depth: MAX_DEPTH });
        }
        let parent = by_id
            .get(&parent_id)
            .ok_or(TreeError::DanglingParent { id: current.id, parent_id })?;
        chain.push(parent.id);
        current = parent;
    }
    chain.reverse();

    if chain.len() != leaf.level as usize {
        return Err(TreeError::LevelMismatch { id: leaf.id, level: leaf.level, depth: chain.len() });
    }
    Ok(chain)
}

/// Problem found in a fetched category list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityIssue {
    #[error("category {id} appears more than once")]
    DuplicateId { id: u32 },

    #[error("category {id} has an empty name")]
    EmptyName { id: u32 },

    #[error("category {id} has level {level}, outside 1..={max}", max = MAX_DEPTH)]
    LevelOutOfRange { id: u32, level: u8 },

    #[error("root category {id} has parent {parent_id}")]
    RootWithParent { id: u32, parent_id: u32 },

    #[error("category {id} at level {level} has no parent")]
    MissingParent { id: u32, level: u8 },

    #[error("category {id} references missing parent {parent_id}")]
    DanglingParent { id: u32, parent_id: u32 },

    #[error("category {id} at level {level} has parent {parent_id} at level {parent_level}")]
    ParentLevelMismatch { id: u32, level: u8, parent_id: u32, parent_level: u8 },
}

impl IntegrityIssue {
    pub fn id(&self) -> u32 {
        match self {
            IntegrityIssue::DuplicateId { id }
            | IntegrityIssue::EmptyName { id }
            | IntegrityIssue::LevelOutOfRange { id, .. }
            | IntegrityIssue::RootWithParent { id, .. }
            | IntegrityIssue::MissingParent { id, .. }
            | IntegrityIssue::DanglingParent { id, .. }
            | IntegrityIssue::ParentLevelMismatch { id, .. } => *id,
        }
    }

    /// Whether the record is unusable and must be left out of the snapshot
    pub fn drops_record(&self) -> bool {
        !matches!(self, IntegrityIssue::EmptyName { .. })
    }
}

/// Issues paired with the index of the offending record
fn check(records: &[Category]) -> Vec<(usize, IntegrityIssue)> {
    let mut first_index: HashMap<u32, usize> = HashMap::new();
    for (index, record) in records.iter().enumerate() {
        first_index.entry(record.id).or_insert(index);
    }

    let mut issues = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let id = record.id;
        if first_index.get(&id) != Some(&index) {
            issues.push((index, IntegrityIssue::DuplicateId { id }));
            continue;
        }
        if record.name.trim().is_empty() {
            issues.push((index, IntegrityIssue::EmptyName { id }));
        }
        if record.level == 0 || record.level > MAX_DEPTH {
            issues.push((index, IntegrityIssue::LevelOutOfRange { id, level: record.level }));
            continue;
        }
        match (record.level, record.parent_id) {
            (1, Some(parent_id)) => issues.push((index, IntegrityIssue::RootWithParent { id, parent_id })),
            (1, None) => {}
            (level, None) => issues.push((index, IntegrityIssue::MissingParent { id, level })),
            (level, Some(parent_id)) => match first_index.get(&parent_id).map(|i| &records[*i]) {
                None => issues.push((index, IntegrityIssue::DanglingParent { id, parent_id })),
                Some(parent) if parent.level + 1 != level => issues.push((
                    index,
                    IntegrityIssue::ParentLevelMismatch { id, level, parent_id, parent_level: parent.level },
                )),
                Some(_) => {}
            },
        }
    }
    issues
}

/// All integrity issues of a record list in input order
pub fn validate(records: &[Category]) -> Vec<IntegrityIssue> {
    check(records).into_iter().map(|(_, issue)| issue).collect()
}

/// Checked category list with its tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorySnapshot {
    records: Vec<Category>,
    issues: Vec<IntegrityIssue>,
    tree: Vec<CategoryTreeItem>,
}

impl CategorySnapshot {
    /// Validate `records`, leaving out every unusable record along with
    /// the descendants that would dangle without it
    pub fn load(records: Vec<Category>) -> Self {
        let mut kept = records;
        let mut issues: Vec<IntegrityIssue> = Vec::new();
        let mut first_pass = true;

        loop {
            let found = check(&kept);
            let dropped: HashSet<usize> =
                found.iter().filter(|(_, issue)| issue.drops_record()).map(|(index, _)| *index).collect();
            for (_, issue) in found {
                if first_pass || issue.drops_record() {
                    tracing::warn!("[TREE] {}", issue);
                    issues.push(issue);
                }
            }
            first_pass = false;
            if dropped.is_empty() {
                break;
            }
            kept = kept
                .into_iter()
                .enumerate()
                .filter(|(index, _)| !dropped.contains(index))
                .map(|(_, record)| record)
                .collect();
        }

        let tree = build_tree(&kept);
        Self { records: kept, issues, tree }
    }

    pub fn records(&self) -> &[Category] {
        &self.records
    }

    pub fn issues(&self) -> &[IntegrityIssue] {
        &self.issues
    }

    pub fn tree(&self) -> &[CategoryTreeItem] {
        &self.tree
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Category> {
        self.records.iter().find(|c| c.id == id)
    }

    pub fn child_count(&self, id: u32) -> usize {
        self.records.iter().filter(|c| c.parent_id == Some(id)).count()
    }

    pub fn has_children(&self, id: u32) -> bool {
        self.child_count(id) > 0
    }

    pub fn resolve_chain(&self, selected_id: u32) -> Result<Vec<u32>, TreeError> {
        resolve_chain_in(selected_id, &self.records)
    }
}

/// Ids of the expanded nodes in the category table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState(HashSet<u32>);

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: u32) -> bool {
        self.0.contains(&id)
    }

    pub fn toggle(&mut self, id: u32) {
        if !self.0.remove(&id) {
            self.0.insert(id);
        }
    }

    pub fn collapse_all(&mut self) {
        self.0.clear();
    }

    /// Forget ids no longer present in `records`
    pub fn retain_existing(&mut self, records: &[Category]) {
        let ids: HashSet<u32> = records.iter().map(|c| c.id).collect();
        self.0.retain(|id| ids.contains(id));
    }
}

/// One row of the category table
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
    pub category: Category,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
}

/// Rows shown for the current expansion; collapsed subtrees are skipped
pub fn visible_rows(tree: &[CategoryTreeItem], expansion: &ExpansionState) -> Vec<TreeRow> {
    fn walk(nodes: &[CategoryTreeItem], depth: usize, expansion: &ExpansionState, rows: &mut Vec<TreeRow>) {
        for node in nodes {
            let expanded = expansion.is_expanded(node.category.id);
            rows.push(TreeRow {
                category: node.category.clone(),
                depth,
                has_children: node.has_children(),
                expanded,
            });
            if expanded {
                walk(&node.children, depth + 1, expansion, rows);
            }
        }
    }

    let mut rows = Vec::new();
    walk(tree, 0, expansion, &mut rows);
    rows
}

/// Indentation drawn before a category name in selectors
pub fn indent_prefix(level: u8) -> &'static str {
    match level {
        0 | 1 => "",
        2 => "└─ ",
        _ => "        └─ ",
    }
}

/// Option of the product category picker
#[derive(Debug, Clone, PartialEq)]
pub struct PickerRow {
    pub id: u32,
    pub label: String,
    /// Nodes with children only group their leaves
    pub disabled: bool,
}

pub fn picker_rows(tree: &[CategoryTreeItem]) -> Vec<PickerRow> {
    fn walk(nodes: &[CategoryTreeItem], rows: &mut Vec<PickerRow>) {
        for node in nodes {
            rows.push(PickerRow {
                id: node.category.id,
                label: format!("{}{}", indent_prefix(node.category.level), node.category.name),
                disabled: node.has_children(),
            });
            walk(&node.children, rows);
        }
    }

    let mut rows = Vec::new();
    walk(tree, &mut rows);
    rows
}

/// "Root > Child > Leaf" path of a product's linked categories
pub fn category_path(links: &[ProductCategoryLink]) -> String {
    let mut linked: Vec<_> = links.iter().filter_map(|link| link.category.as_ref()).collect();
    linked.sort_by_key(|c| c.level);
    linked.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(" > ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LinkedCategory;
    use crate::testing::make_category;

    fn sample_records() -> Vec<Category> {
        vec![
            make_category(1, "Kitchen", 1, None),
            make_category(2, "Cups", 2, Some(1)),
            make_category(3, "Mugs", 3, Some(2)),
            make_category(4, "Garden", 1, None),
            make_category(5, "Plates", 2, Some(1)),
            make_category(6, "Espresso", 3, Some(2)),
        ]
    }

    fn ids(records: &[Category]) -> Vec<u32> {
        records.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_build_tree_nests_by_level() {
        let tree = build_tree(&sample_records());

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].category.id, 1);
        assert_eq!(tree[1].category.id, 4);
        assert!(!tree[1].has_children());

        let kitchen = &tree[0];
        assert_eq!(kitchen.children.iter().map(|c| c.category.id).collect::<Vec<_>>(), vec![2, 5]);
        let cups = &kitchen.children[0];
        assert_eq!(cups.children.iter().map(|c| c.category.id).collect::<Vec<_>>(), vec![3, 6]);
        assert!(cups.children.iter().all(|c| !c.has_children()));
    }

    #[test]
    fn test_children_are_non_empty_and_one_level_deeper() {
        fn check_node(node: &CategoryTreeItem) {
            for child in &node.children {
                assert_eq!(child.category.level, node.category.level + 1);
                assert_eq!(child.category.parent_id, Some(node.category.id));
                check_node(child);
            }
        }
        for root in build_tree(&sample_records()) {
            assert_eq!(root.category.level, 1);
            check_node(&root);
        }
    }

    #[test]
    fn test_leaf_serializes_without_children() {
        let tree = build_tree(&sample_records());
        let garden = serde_json::to_value(&tree[1]).unwrap();
        assert!(garden.get("children").is_none());
        assert_eq!(garden["name"], "Garden");

        let kitchen = serde_json::to_value(&tree[0]).unwrap();
        assert_eq!(kitchen["children"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_build_tree_drops_misfits() {
        let records = vec![
            make_category(1, "Root", 1, None),
            make_category(2, "Orphan", 2, Some(99)),
            make_category(3, "Skipped level", 3, Some(1)),
            make_category(4, "Deep", 4, Some(3)),
        ];
        let tree = build_tree(&records);
        assert_eq!(ids(&flatten(&tree)), vec![1]);
    }

    #[test]
    fn test_depth_bound_cuts_tree() {
        let tree = build_tree_with_depth(&sample_records(), 2);
        assert_eq!(ids(&flatten(&tree)), vec![1, 2, 5, 4]);
        assert!(build_tree_with_depth(&sample_records(), 0).is_empty());
    }

    #[test]
    fn test_flatten_is_preorder_permutation() {
        let records = sample_records();
        let flat = flatten(&build_tree(&records));

        assert_eq!(ids(&flat), vec![1, 2, 3, 6, 5, 4]);
        let mut sorted = ids(&flat);
        sorted.sort();
        assert_eq!(sorted, vec![1, 2, 3, 4, 5, 6]);
        assert!(flat.iter().all(|c| records.contains(c)));
    }

    #[test]
    fn test_resolve_chain_abc() {
        let records = vec![
            make_category(1, "A", 1, None),
            make_category(2, "B", 2, Some(1)),
            make_category(3, "C", 3, Some(2)),
        ];
        let tree = build_tree(&records);
        assert_eq!(resolve_chain(3, &tree), Ok(vec![1, 2, 3]));
        assert_eq!(resolve_chain(2, &tree), Ok(vec![1, 2]));
        assert_eq!(resolve_chain(1, &tree), Ok(vec![1]));
    }

    #[test]
    fn test_resolve_chain_properties() {
        let tree = build_tree(&sample_records());
        for record in flatten(&tree) {
            let chain = resolve_chain(record.id, &tree).unwrap();
            assert_eq!(chain.len(), record.level as usize);
            assert_eq!(chain.last(), Some(&record.id));
            let first = flatten(&tree).into_iter().find(|c| c.id == chain[0]).unwrap();
            assert_eq!(first.parent_id, None);
        }
    }

    #[test]
    fn test_resolve_chain_missing_is_empty() {
        let tree = build_tree(&sample_records());
        assert_eq!(resolve_chain(42, &tree), Ok(vec![]));
    }

    #[test]
    fn test_resolve_chain_reports_dangling_parent() {
        let records = vec![make_category(1, "A", 1, None), make_category(3, "C", 3, Some(2))];
        assert_eq!(
            resolve_chain_in(3, &records),
            Err(TreeError::DanglingParent { id: 3, parent_id: 2 })
        );
    }

    #[test]
    fn test_resolve_chain_bounded_on_cycle() {
        let records = vec![make_category(1, "A", 2, Some(2)), make_category(2, "B", 2, Some(1))];
        assert_eq!(
            resolve_chain_in(1, &records),
            Err(TreeError::ChainTooDeep { id: 1, max_depth: MAX_DEPTH })
        );
    }

    #[test]
    fn test_resolve_chain_level_mismatch() {
        let records = vec![make_category(1, "A", 1, None), make_category(2, "B", 3, Some(1))];
        assert_eq!(
            resolve_chain_in(2, &records),
            Err(TreeError::LevelMismatch { id: 2, level: 3, depth: 2 })
        );
    }

    #[test]
    fn test_validate_reports_each_problem() {
        let records = vec![
            make_category(1, "Root", 1, None),
            make_category(1, "Root again", 1, None),
            make_category(2, " ", 1, None),
            make_category(3, "Too deep", 4, Some(1)),
            make_category(4, "Root child", 1, Some(1)),
            make_category(5, "No parent", 2, None),
            make_category(6, "Lost", 2, Some(77)),
            make_category(7, "Wrong level", 3, Some(1)),
        ];
        let issues = validate(&records);
        assert_eq!(
            issues,
            vec![
                IntegrityIssue::DuplicateId { id: 1 },
                IntegrityIssue::EmptyName { id: 2 },
                IntegrityIssue::LevelOutOfRange { id: 3, level: 4 },
                IntegrityIssue::RootWithParent { id: 4, parent_id: 1 },
                IntegrityIssue::MissingParent { id: 5, level: 2 },
                IntegrityIssue::DanglingParent { id: 6, parent_id: 77 },
                IntegrityIssue::ParentLevelMismatch { id: 7, level: 3, parent_id: 1, parent_level: 1 },
            ]
        );
        assert!(validate(&sample_records()).is_empty());
    }

    #[test]
    fn test_snapshot_drops_bad_records_and_their_descendants() {
        let records = vec![
            make_category(1, "Root", 1, None),
            make_category(2, "Lost", 2, Some(77)),
            make_category(3, "Below lost", 3, Some(2)),
            make_category(4, "", 2, Some(1)),
        ];
        let snapshot = CategorySnapshot::load(records);

        assert_eq!(ids(snapshot.records()), vec![1, 4]);
        assert_eq!(
            snapshot.issues(),
            &[
                IntegrityIssue::DanglingParent { id: 2, parent_id: 77 },
                IntegrityIssue::EmptyName { id: 4 },
                IntegrityIssue::DanglingParent { id: 3, parent_id: 2 },
            ]
        );
        assert_eq!(ids(&flatten(snapshot.tree())), vec![1, 4]);
        assert_eq!(snapshot.child_count(1), 1);
        assert!(!snapshot.has_children(4));
    }

    #[test]
    fn test_snapshot_keeps_first_duplicate() {
        let snapshot = CategorySnapshot::load(vec![
            make_category(1, "First", 1, None),
            make_category(1, "Second", 1, None),
        ]);
        assert_eq!(snapshot.records().len(), 1);
        assert_eq!(snapshot.get(1).map(|c| c.name.as_str()), Some("First"));
    }

    #[test]
    fn test_visible_rows_follow_expansion() {
        let tree = build_tree(&sample_records());
        let mut expansion = ExpansionState::new();

        let rows = visible_rows(&tree, &expansion);
        assert_eq!(rows.iter().map(|r| r.category.id).collect::<Vec<_>>(), vec![1, 4]);
        assert!(rows[0].has_children);
        assert!(!rows[1].has_children);

        expansion.toggle(1);
        expansion.toggle(2);
        let rows = visible_rows(&tree, &expansion);
        assert_eq!(rows.iter().map(|r| r.category.id).collect::<Vec<_>>(), vec![1, 2, 3, 6, 5, 4]);
        assert_eq!(rows.iter().map(|r| r.depth).collect::<Vec<_>>(), vec![0, 1, 2, 2, 1, 0]);

        // Collapsing the root hides the still-expanded grandchildren too
        expansion.toggle(1);
        assert!(expansion.is_expanded(2));
        assert_eq!(visible_rows(&tree, &expansion).len(), 2);
    }

    #[test]
    fn test_expansion_retain_existing() {
        let mut expansion = ExpansionState::new();
        expansion.toggle(1);
        expansion.toggle(99);
        expansion.retain_existing(&sample_records());
        assert!(expansion.is_expanded(1));
        assert!(!expansion.is_expanded(99));
    }

    #[test]
    fn test_picker_rows_disable_folders() {
        let rows = picker_rows(&build_tree(&sample_records()));
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Kitchen", "└─ Cups", "        └─ Mugs", "        └─ Espresso", "└─ Plates", "Garden"]
        );
        let enabled: Vec<u32> = rows.iter().filter(|r| !r.disabled).map(|r| r.id).collect();
        assert_eq!(enabled, vec![3, 6, 5, 4]);
    }

    #[test]
    fn test_category_path_sorted_by_level() {
        let link = |id: u32, name: &str, level: u8| ProductCategoryLink {
            category_id: id,
            category: Some(LinkedCategory { id, name: name.into(), level }),
        };
        let links = vec![link(3, "Mugs", 3), link(1, "Kitchen", 1), link(2, "Cups", 2)];
        assert_eq!(category_path(&links), "Kitchen > Cups > Mugs");
        assert_eq!(category_path(&[]), "");
    }
}
