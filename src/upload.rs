//! Image Upload Pipeline
//!
//! Per-slot thumbnail state for the product form. Files are admitted
//! against the slot capacity, uploaded concurrently and settled one by
//! one; the form's image list is recomputed from the successful uploads.

use std::future::Future;

use futures::future::join_all;
use leptos_dragdrop::DropTarget;

use crate::error::{AppError, AppResult};
use crate::models::{ImageKind, ProductImage};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UploadStatus {
    Uploading,
    Done(String),
    Failed(String),
}

/// Thumbnail of one slot
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub local_id: u32,
    pub file_name: String,
    pub kind: ImageKind,
    pub display_order: u32,
    pub status: UploadStatus,
    /// Object URL for the local preview
    pub preview_url: Option<String>,
}

impl UploadedImage {
    pub fn url(&self) -> Option<&str> {
        match &self.status {
            UploadStatus::Done(url) => Some(url),
            UploadStatus::Uploading | UploadStatus::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, UploadStatus::Failed(_))
    }

    /// Image shown in the thumbnail
    pub fn display_src(&self) -> Option<String> {
        self.preview_url.clone().or_else(|| self.url().map(str::to_string))
    }
}

/// File picked or dropped by the user; `source` is the browser handle
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFile<F> {
    pub name: String,
    pub mime: String,
    pub source: F,
}

impl<F> PendingFile<F> {
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

/// File accepted into a slot, waiting for its upload
#[derive(Debug, Clone, PartialEq)]
pub struct Admitted<F> {
    pub local_id: u32,
    pub file: PendingFile<F>,
}

/// Keep only images; a drop with nothing usable is an error
pub fn filter_images<F>(files: Vec<PendingFile<F>>) -> AppResult<Vec<PendingFile<F>>> {
    if files.is_empty() {
        return Ok(files);
    }
    let images: Vec<PendingFile<F>> = files.into_iter().filter(PendingFile::is_image).collect();
    if images.is_empty() {
        return Err(AppError::validation("images", "Only image files can be dropped here"));
    }
    Ok(images)
}

fn capacity_message(kind: ImageKind) -> String {
    match kind {
        ImageKind::Main => "Only one main image can be uploaded".to_string(),
        ImageKind::Description => format!("Up to {} description images can be uploaded", kind.max_images()),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageUploadState {
    main: Vec<UploadedImage>,
    description: Vec<UploadedImage>,
    /// Display order handed to the next admitted file; never reused
    next_order: u32,
    next_id: u32,
}

impl ImageUploadState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Thumbnails for images already stored on the product
    pub fn from_existing(images: &[ProductImage]) -> Self {
        let mut state = Self::new();
        let mut sorted = images.to_vec();
        sorted.sort_by_key(|img| img.display_order);
        for image in sorted {
            state.next_id += 1;
            let entry = UploadedImage {
                local_id: state.next_id,
                file_name: image.url.rsplit('/').next().unwrap_or_default().to_string(),
                kind: image.kind,
                display_order: image.display_order,
                status: UploadStatus::Done(image.url.clone()),
                preview_url: None,
            };
            state.next_order = state.next_order.max(image.display_order + 1);
            state.slot_mut(image.kind).push(entry);
        }
        state
    }

    pub fn slot(&self, kind: ImageKind) -> &[UploadedImage] {
        match kind {
            ImageKind::Main => &self.main,
            ImageKind::Description => &self.description,
        }
    }

    fn slot_mut(&mut self, kind: ImageKind) -> &mut Vec<UploadedImage> {
        match kind {
            ImageKind::Main => &mut self.main,
            ImageKind::Description => &mut self.description,
        }
    }

    fn find_mut(&mut self, local_id: u32) -> Option<&mut UploadedImage> {
        self.main.iter_mut().chain(self.description.iter_mut()).find(|img| img.local_id == local_id)
    }

    pub fn remaining(&self, kind: ImageKind) -> usize {
        kind.max_images().saturating_sub(self.slot(kind).len())
    }

    /// Accept `files` into the slot up to its capacity. Each admitted file
    /// starts uploading with the next display order.
    pub fn admit<F>(&mut self, kind: ImageKind, files: Vec<PendingFile<F>>) -> AppResult<Vec<Admitted<F>>> {
        if files.is_empty() {
            return Ok(Vec::new());
        }
        let remaining = self.remaining(kind);
        if remaining == 0 {
            return Err(AppError::validation("images", capacity_message(kind)));
        }
        if files.len() > remaining {
            tracing::warn!("[UPLOAD] {} slot keeps {} of {} file(s)", kind.as_str(), remaining, files.len());
        }

        let mut admitted = Vec::new();
        for file in files.into_iter().take(remaining) {
            self.next_id += 1;
            let local_id = self.next_id;
            let display_order = self.next_order;
            self.next_order += 1;
            self.slot_mut(kind).push(UploadedImage {
                local_id,
                file_name: file.name.clone(),
                kind,
                display_order,
                status: UploadStatus::Uploading,
                preview_url: None,
            });
            admitted.push(Admitted { local_id, file });
        }
        Ok(admitted)
    }

    pub fn set_preview(&mut self, local_id: u32, preview_url: String) {
        if let Some(image) = self.find_mut(local_id) {
            image.preview_url = Some(preview_url);
        }
    }

    /// Record the outcome of one upload. Returns false when the thumbnail
    /// was removed in the meantime.
    pub fn complete(&mut self, local_id: u32, result: AppResult<String>) -> bool {
        let Some(image) = self.find_mut(local_id) else {
            return false;
        };
        image.status = match result {
            Ok(url) => UploadStatus::Done(url),
            Err(err) => {
                tracing::error!("[UPLOAD] {} failed: {}", image.file_name, err);
                UploadStatus::Failed(err.user_message())
            }
        };
        true
    }

    /// Apply a settled batch and return the new form images
    pub fn settle(&mut self, results: Vec<(u32, AppResult<String>)>) -> Vec<ProductImage> {
        for (local_id, result) in results {
            self.complete(local_id, result);
        }
        self.form_images()
    }

    /// Drop a thumbnail; returns its preview URL so it can be revoked
    pub fn remove(&mut self, local_id: u32) -> Option<UploadedImage> {
        for kind in [ImageKind::Main, ImageKind::Description] {
            let slot = self.slot_mut(kind);
            if let Some(index) = slot.iter().position(|img| img.local_id == local_id) {
                return Some(slot.remove(index));
            }
        }
        None
    }

    /// Move `dragged` within its slot. The slot's display orders are
    /// handed out again in the new thumbnail order.
    pub fn reorder(&mut self, kind: ImageKind, dragged: u32, target: DropTarget) {
        let slot = self.slot_mut(kind);
        let ids: Vec<u32> = slot.iter().map(|img| img.local_id).collect();
        let new_order = leptos_dragdrop::reorder(&ids, dragged, target);
        if new_order == ids {
            return;
        }

        let mut orders: Vec<u32> = slot.iter().map(|img| img.display_order).collect();
        orders.sort_unstable();
        let mut reordered: Vec<UploadedImage> = new_order
            .iter()
            .filter_map(|id| slot.iter().find(|img| img.local_id == *id).cloned())
            .collect();
        for (image, order) in reordered.iter_mut().zip(orders) {
            image.display_order = order;
        }
        *slot = reordered;
    }

    /// Successful uploads of both slots in display order
    pub fn form_images(&self) -> Vec<ProductImage> {
        let mut images: Vec<ProductImage> = self
            .main
            .iter()
            .chain(self.description.iter())
            .filter_map(|img| {
                img.url().map(|url| ProductImage { url: url.to_string(), display_order: img.display_order, kind: img.kind })
            })
            .collect();
        images.sort_by_key(|img| img.display_order);
        images
    }

    pub fn is_busy(&self) -> bool {
        self.main.iter().chain(self.description.iter()).any(|img| img.status == UploadStatus::Uploading)
    }
}

/// Upload every admitted file at once; each settles on its own
pub async fn upload_batch<F, U, Fut>(admitted: Vec<Admitted<F>>, upload: U) -> Vec<(u32, AppResult<String>)>
where
    U: Fn(PendingFile<F>) -> Fut,
    Fut: Future<Output = AppResult<String>>,
{
    let uploads = admitted.into_iter().map(|Admitted { local_id, file }| {
        let fut = upload(file);
        async move { (local_id, fut.await) }
    });
    join_all(uploads).await
}

/// Nesting depth of file drag events over a drop zone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragCounter {
    depth: u32,
}

impl DragCounter {
    pub fn enter(&mut self) {
        self.depth += 1;
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.depth = 0;
    }

    pub fn is_over(&self) -> bool {
        self.depth > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CatalogApi, ImageUpload};
    use crate::testing::FakeCatalogApi;

    fn make_file(name: &str) -> PendingFile<ImageUpload> {
        make_typed_file(name, "image/png")
    }

    fn make_typed_file(name: &str, mime: &str) -> PendingFile<ImageUpload> {
        PendingFile {
            name: name.to_string(),
            mime: mime.to_string(),
            source: ImageUpload { file_name: name.to_string(), mime: mime.to_string(), bytes: vec![1, 2, 3] },
        }
    }

    #[test]
    fn test_admit_assigns_orders_and_starts_uploading() {
        let mut state = ImageUploadState::new();
        let admitted = state.admit(ImageKind::Description, vec![make_file("a.png"), make_file("b.png")]).unwrap();

        assert_eq!(admitted.len(), 2);
        let slot = state.slot(ImageKind::Description);
        assert_eq!(slot.iter().map(|i| i.display_order).collect::<Vec<_>>(), vec![0, 1]);
        assert!(slot.iter().all(|i| i.status == UploadStatus::Uploading));
        assert!(state.is_busy());
    }

    #[test]
    fn test_admit_truncates_to_capacity() {
        let mut state = ImageUploadState::new();
        let files: Vec<_> = (0..7).map(|i| make_file(&format!("{}.png", i))).collect();

        let admitted = state.admit(ImageKind::Description, files).unwrap();

        assert_eq!(admitted.len(), 5);
        assert_eq!(state.remaining(ImageKind::Description), 0);
        let err = state.admit(ImageKind::Description, vec![make_file("x.png")]).unwrap_err();
        assert_eq!(err.field(), Some("images"));
    }

    #[test]
    fn test_full_main_slot_rejects() {
        let mut state = ImageUploadState::new();
        assert_eq!(state.admit(ImageKind::Main, vec![make_file("a.png"), make_file("b.png")]).unwrap().len(), 1);

        let err = state.admit(ImageKind::Main, vec![make_file("c.png")]).unwrap_err();
        assert!(err.user_message().contains("one main image"));
    }

    #[test]
    fn test_filter_images() {
        let kept = filter_images(vec![make_file("a.png"), make_typed_file("notes.txt", "text/plain")]).unwrap();
        assert_eq!(kept.len(), 1);

        let err = filter_images(vec![make_typed_file("notes.txt", "text/plain")]).unwrap_err();
        assert_eq!(err.field(), Some("images"));
        assert!(filter_images(Vec::<PendingFile<()>>::new()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_with_one_failure_keeps_successful_urls() {
        let api = FakeCatalogApi::new();
        api.fail_upload("b.png");
        let mut state = ImageUploadState::new();
        let admitted = state
            .admit(ImageKind::Description, vec![make_file("a.png"), make_file("b.png"), make_file("c.png")])
            .unwrap();

        let results = upload_batch(admitted, |file| api.upload_image(file.source)).await;
        let images = state.settle(results);

        assert_eq!(api.max_in_flight.get(), 3);
        assert_eq!(
            images.iter().map(|i| i.url.as_str()).collect::<Vec<_>>(),
            vec!["https://cdn.test/a.png", "https://cdn.test/c.png"]
        );
        let failed: Vec<&str> = state
            .slot(ImageKind::Description)
            .iter()
            .filter(|i| i.is_failed())
            .map(|i| i.file_name.as_str())
            .collect();
        assert_eq!(failed, vec!["b.png"]);
        assert!(!state.is_busy());
    }

    #[test]
    fn test_form_images_span_both_slots_in_order() {
        let mut state = ImageUploadState::new();
        let desc = state.admit(ImageKind::Description, vec![make_file("d.png")]).unwrap();
        let main = state.admit(ImageKind::Main, vec![make_file("m.png")]).unwrap();
        state.complete(main[0].local_id, Ok("m".into()));
        state.complete(desc[0].local_id, Ok("d".into()));

        let images = state.form_images();
        assert_eq!(
            images,
            vec![
                ProductImage { url: "d".into(), display_order: 0, kind: ImageKind::Description },
                ProductImage { url: "m".into(), display_order: 1, kind: ImageKind::Main },
            ]
        );
    }

    #[test]
    fn test_remove_recomputes_and_orders_stay_unique() {
        let mut state = ImageUploadState::new();
        let admitted = state.admit(ImageKind::Description, vec![make_file("a.png"), make_file("b.png")]).unwrap();
        state.settle(vec![(admitted[0].local_id, Ok("a".into())), (admitted[1].local_id, Ok("b".into()))]);

        assert!(state.remove(admitted[0].local_id).is_some());
        assert_eq!(state.form_images().len(), 1);

        let next = state.admit(ImageKind::Description, vec![make_file("c.png")]).unwrap();
        let orders: Vec<u32> = state.slot(ImageKind::Description).iter().map(|i| i.display_order).collect();
        assert_eq!(orders, vec![1, 2]);
        assert_eq!(next[0].file.name, "c.png");
    }

    #[test]
    fn test_completion_after_removal_is_ignored() {
        let mut state = ImageUploadState::new();
        let admitted = state.admit(ImageKind::Main, vec![make_file("a.png")]).unwrap();
        state.remove(admitted[0].local_id);

        assert!(!state.complete(admitted[0].local_id, Ok("a".into())));
        assert!(state.form_images().is_empty());
    }

    #[test]
    fn test_reorder_swaps_display_orders() {
        let mut state = ImageUploadState::new();
        let admitted = state
            .admit(ImageKind::Description, vec![make_file("a.png"), make_file("b.png"), make_file("c.png")])
            .unwrap();
        let ids: Vec<u32> = admitted.iter().map(|a| a.local_id).collect();
        state.settle(ids.iter().map(|id| (*id, Ok(format!("u{}", id)))).collect());

        state.reorder(ImageKind::Description, ids[2], DropTarget::Item(ids[0]));

        let slot = state.slot(ImageKind::Description);
        assert_eq!(slot.iter().map(|i| i.file_name.as_str()).collect::<Vec<_>>(), vec!["c.png", "a.png", "b.png"]);
        assert_eq!(slot.iter().map(|i| i.display_order).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(state.form_images()[0].url, format!("u{}", ids[2]));
    }

    #[test]
    fn test_from_existing_continues_order() {
        let state = ImageUploadState::from_existing(&[
            ProductImage { url: "https://cdn/m.png".into(), display_order: 0, kind: ImageKind::Main },
            ProductImage { url: "https://cdn/d.png".into(), display_order: 4, kind: ImageKind::Description },
        ]);
        assert_eq!(state.remaining(ImageKind::Main), 0);
        assert_eq!(state.form_images().len(), 2);
        assert_eq!(state.slot(ImageKind::Description)[0].file_name, "d.png");

        let mut state = state;
        let admitted = state.admit(ImageKind::Description, vec![make_file("n.png")]).unwrap();
        assert_eq!(state.slot(ImageKind::Description)[1].display_order, 5);
        assert_eq!(admitted.len(), 1);
    }

    #[test]
    fn test_drag_counter_survives_nested_leave() {
        let mut counter = DragCounter::default();
        counter.enter();
        counter.enter();
        counter.leave();
        assert!(counter.is_over());
        counter.leave();
        assert!(!counter.is_over());
        counter.leave();
        assert!(!counter.is_over());
        counter.enter();
        counter.reset();
        assert!(!counter.is_over());
    }
}
