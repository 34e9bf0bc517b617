//! Category Add / Edit / Delete Flows
//!
//! Form validation and request building for the category modals. The
//! async entry points send the request and invalidate the category list
//! on success; failures leave local state untouched.

use crate::api::CatalogApi;
use crate::error::{AppError, AppResult};
use crate::models::{Category, CategoryUpdate, NewCategory, MAX_DEPTH};
use crate::query::{Invalidate, QueryKey};
use crate::tree::CategorySnapshot;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryForm {
    pub name: String,
    pub parent_id: Option<u32>,
}

impl CategoryForm {
    /// Edit form seeded from the record
    pub fn for_edit(category: &Category) -> Self {
        Self { name: category.name.clone(), parent_id: category.parent_id }
    }
}

/// Level of a new category under `parent`
pub fn derive_level(parent: Option<&Category>) -> u8 {
    match parent {
        None => 1,
        Some(p) if p.level == 1 => 2,
        Some(_) => 3,
    }
}

/// Records a new category may be created under
pub fn add_candidates(records: &[Category]) -> Vec<Category> {
    records.iter().filter(|c| c.level < MAX_DEPTH).cloned().collect()
}

/// Records offered as the new parent of `target`
pub fn edit_candidates(records: &[Category], target: &Category) -> Vec<Category> {
    records
        .iter()
        .filter(|c| c.id != target.id && c.level < target.level)
        .cloned()
        .collect()
}

/// Candidates `prepare_edit` accepts: exactly one level above `target`
pub fn selectable_parents(records: &[Category], target: &Category) -> Vec<Category> {
    edit_candidates(records, target)
        .into_iter()
        .filter(|c| c.level + 1 == target.level)
        .collect()
}

/// Roots never change parent, so the selector is hidden for them
pub fn shows_parent_selector(target: &Category) -> bool {
    !target.is_root()
}

fn required_name(form: &CategoryForm) -> AppResult<String> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("name", "Category name is required"));
    }
    Ok(name.to_string())
}

pub fn prepare_add(form: &CategoryForm, snapshot: &CategorySnapshot) -> AppResult<NewCategory> {
    let name = required_name(form)?;
    let parent = match form.parent_id {
        None => None,
        Some(id) => {
            let parent = snapshot
                .get(id)
                .ok_or_else(|| AppError::validation("parent_id", "The selected parent no longer exists"))?;
            if parent.level >= MAX_DEPTH {
                return Err(AppError::validation(
                    "parent_id",
                    format!("Categories can only be nested {} levels deep", MAX_DEPTH),
                ));
            }
            Some(parent)
        }
    };

    Ok(NewCategory {
        key: name.clone(),
        name,
        parent_id: parent.map(|p| p.id),
        level: derive_level(parent),
    })
}

pub fn prepare_edit(form: &CategoryForm, target: &Category, snapshot: &CategorySnapshot) -> AppResult<CategoryUpdate> {
    let name = required_name(form)?;
    if !shows_parent_selector(target) {
        return Ok(CategoryUpdate { name, parent_id: None });
    }

    let parent_id = match form.parent_id {
        None => None,
        Some(id) if id == target.id => {
            return Err(AppError::validation("parent_id", "A category cannot be its own parent"));
        }
        Some(id) => {
            let parent = snapshot
                .get(id)
                .ok_or_else(|| AppError::validation("parent_id", "The selected parent no longer exists"))?;
            if parent.level + 1 != target.level {
                return Err(AppError::validation(
                    "parent_id",
                    format!("The parent of a level {} category must be at level {}", target.level, target.level - 1),
                ));
            }
            Some(parent.id)
        }
    };
    Ok(CategoryUpdate { name, parent_id })
}

/// Confirmation text shown when deleting a category that still has children
pub fn delete_warning(snapshot: &CategorySnapshot, id: u32) -> Option<String> {
    match snapshot.child_count(id) {
        0 => None,
        1 => Some("This category has 1 subcategory. The server will refuse to delete it until it is moved or removed.".to_string()),
        n => Some(format!(
            "This category has {} subcategories. The server will refuse to delete it until they are moved or removed.",
            n
        )),
    }
}

pub async fn add_category(
    api: &dyn CatalogApi,
    invalidator: &dyn Invalidate,
    form: &CategoryForm,
    snapshot: &CategorySnapshot,
) -> AppResult<Category> {
    let body = prepare_add(form, snapshot)?;
    let created = api.create_category(&body).await?;
    tracing::info!("[CATEGORY] Created {} '{}' at level {}", created.id, created.name, created.level);
    invalidator.invalidate(QueryKey::Categories);
    Ok(created)
}

pub async fn edit_category(
    api: &dyn CatalogApi,
    invalidator: &dyn Invalidate,
    target: &Category,
    form: &CategoryForm,
    snapshot: &CategorySnapshot,
) -> AppResult<Category> {
    let body = prepare_edit(form, target, snapshot)?;
    let updated = api.update_category(target.id, &body).await?;
    tracing::info!("[CATEGORY] Updated {} '{}'", updated.id, updated.name);
    invalidator.invalidate(QueryKey::Categories);
    Ok(updated)
}

pub async fn delete_category(api: &dyn CatalogApi, invalidator: &dyn Invalidate, id: u32) -> AppResult<()> {
    api.delete_category(id).await?;
    tracing::info!("[CATEGORY] Deleted {}", id);
    invalidator.invalidate(QueryKey::Categories);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{make_category, FakeCatalogApi, RecordingInvalidator};

    fn sample_records() -> Vec<Category> {
        vec![
            make_category(1, "Kitchen", 1, None),
            make_category(2, "Cups", 2, Some(1)),
            make_category(3, "Mugs", 3, Some(2)),
            make_category(4, "Garden", 1, None),
        ]
    }

    fn snapshot() -> CategorySnapshot {
        CategorySnapshot::load(sample_records())
    }

    fn form(name: &str, parent_id: Option<u32>) -> CategoryForm {
        CategoryForm { name: name.to_string(), parent_id }
    }

    #[test]
    fn test_derive_level() {
        let records = sample_records();
        assert_eq!(derive_level(None), 1);
        assert_eq!(derive_level(Some(&records[0])), 2);
        assert_eq!(derive_level(Some(&records[1])), 3);
    }

    #[test]
    fn test_add_candidates_exclude_deepest_level() {
        let ids: Vec<u32> = add_candidates(&sample_records()).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[test]
    fn test_edit_candidates_exclude_self_and_same_level() {
        let records = sample_records();
        let ids = |target: &Category| edit_candidates(&records, target).iter().map(|c| c.id).collect::<Vec<_>>();
        assert_eq!(ids(&records[2]), vec![1, 2, 4]);
        assert_eq!(ids(&records[1]), vec![1, 4]);
        assert!(ids(&records[0]).is_empty());
    }

    #[test]
    fn test_selectable_parents_are_all_submittable() {
        let snapshot = snapshot();
        let mugs = snapshot.get(3).unwrap().clone();

        let offered = selectable_parents(snapshot.records(), &mugs);

        assert_eq!(offered.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2]);
        for parent in offered {
            assert!(prepare_edit(&form("Mugs", Some(parent.id)), &mugs, &snapshot).is_ok());
        }
        let cups = snapshot.get(2).unwrap().clone();
        let ids: Vec<u32> = selectable_parents(snapshot.records(), &cups).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn test_prepare_add_trims_and_keys_by_name() {
        let body = prepare_add(&form("  Bowls ", Some(1)), &snapshot()).unwrap();
        assert_eq!(body, NewCategory { key: "Bowls".into(), name: "Bowls".into(), parent_id: Some(1), level: 2 });
    }

    #[test]
    fn test_prepare_add_rejects_bad_input() {
        let err = prepare_add(&form("   ", None), &snapshot()).unwrap_err();
        assert_eq!(err.field(), Some("name"));

        let err = prepare_add(&form("Tiny mugs", Some(3)), &snapshot()).unwrap_err();
        assert_eq!(err.field(), Some("parent_id"));

        let err = prepare_add(&form("Ghost child", Some(99)), &snapshot()).unwrap_err();
        assert_eq!(err.field(), Some("parent_id"));
    }

    #[test]
    fn test_prepare_edit_root_ignores_parent() {
        let snapshot = snapshot();
        let root = snapshot.get(1).unwrap().clone();
        let body = prepare_edit(&form("Home", Some(4)), &root, &snapshot).unwrap();
        assert_eq!(body, CategoryUpdate { name: "Home".into(), parent_id: None });
    }

    #[test]
    fn test_prepare_edit_requires_parent_one_level_up() {
        let snapshot = snapshot();
        let mugs = snapshot.get(3).unwrap().clone();

        let err = prepare_edit(&form("Mugs", Some(1)), &mugs, &snapshot).unwrap_err();
        assert_eq!(err.field(), Some("parent_id"));
        let err = prepare_edit(&form("Mugs", Some(3)), &mugs, &snapshot).unwrap_err();
        assert_eq!(err.field(), Some("parent_id"));

        let body = prepare_edit(&form("Big mugs", Some(2)), &mugs, &snapshot).unwrap();
        assert_eq!(body.parent_id, Some(2));
    }

    #[test]
    fn test_delete_warning_counts_children() {
        let snapshot = snapshot();
        assert!(delete_warning(&snapshot, 1).unwrap().contains("1 subcategory"));
        assert_eq!(delete_warning(&snapshot, 3), None);
        assert_eq!(delete_warning(&snapshot, 4), None);
    }

    #[tokio::test]
    async fn test_add_creates_each_level_and_invalidates() {
        let api = FakeCatalogApi::with_categories(sample_records());
        let invalidator = RecordingInvalidator::new();

        let root = add_category(&api, &invalidator, &form("Bath", None), &snapshot()).await.unwrap();
        let child = add_category(&api, &invalidator, &form("Towels", Some(4)), &snapshot()).await.unwrap();
        let leaf = add_category(&api, &invalidator, &form("Saucers", Some(2)), &snapshot()).await.unwrap();

        assert_eq!((root.level, root.parent_id), (1, None));
        assert_eq!((child.level, child.parent_id), (2, Some(4)));
        assert_eq!((leaf.level, leaf.parent_id), (3, Some(2)));
        assert_eq!(invalidator.recorded(), vec![QueryKey::Categories; 3]);
    }

    #[tokio::test]
    async fn test_validation_failure_sends_nothing() {
        let api = FakeCatalogApi::with_categories(sample_records());
        let invalidator = RecordingInvalidator::new();

        let err = add_category(&api, &invalidator, &form("", None), &snapshot()).await.unwrap_err();

        assert_eq!(err.field(), Some("name"));
        assert_eq!(api.categories.borrow().len(), 4);
        assert!(invalidator.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_edit_renames_and_invalidates() {
        let api = FakeCatalogApi::with_categories(sample_records());
        let invalidator = RecordingInvalidator::new();
        let snapshot = snapshot();
        let cups = snapshot.get(2).unwrap().clone();

        let updated = edit_category(&api, &invalidator, &cups, &form("Teacups", Some(1)), &snapshot).await.unwrap();

        assert_eq!(updated.name, "Teacups");
        assert_eq!(updated.level, 2);
        assert_eq!(invalidator.recorded(), vec![QueryKey::Categories]);
    }

    #[tokio::test]
    async fn test_delete_with_children_is_rejected_and_kept() {
        let api = FakeCatalogApi::with_categories(sample_records());
        let invalidator = RecordingInvalidator::new();
        let before = snapshot();

        let err = delete_category(&api, &invalidator, 1).await.unwrap_err();

        assert!(err.is_conflict());
        assert!(before.get(1).is_some());
        assert_eq!(api.categories.borrow().len(), 4);
        assert!(invalidator.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_delete_leaf_invalidates() {
        let api = FakeCatalogApi::with_categories(sample_records());
        let invalidator = RecordingInvalidator::new();

        delete_category(&api, &invalidator, 3).await.unwrap();

        assert!(api.categories.borrow().iter().all(|c| c.id != 3));
        assert_eq!(invalidator.recorded(), vec![QueryKey::Categories]);
    }

    #[tokio::test]
    async fn test_network_failure_surfaces() {
        let api = FakeCatalogApi::with_categories(sample_records());
        api.offline.set(true);
        let invalidator = RecordingInvalidator::new();

        let err = delete_category(&api, &invalidator, 3).await.unwrap_err();

        assert!(matches!(err, AppError::Network(_)));
        assert!(err.user_message().contains("try again"));
    }
}
