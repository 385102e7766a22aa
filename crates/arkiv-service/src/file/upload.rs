//! Flat and tree uploads.
//!
//! Both upload shapes run as one transaction per top-level call: a
//! duplicate-name rejection partway through leaves no nodes behind from
//! earlier entries in the same call. Blob writes are not rolled back —
//! an orphaned blob is merely unreferenced.

use std::sync::Arc;

use bytes::Bytes;
use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::info;
use uuid::Uuid;

use arkiv_core::config::storage::StorageConfig;
use arkiv_core::error::{AppError, ErrorKind};
use arkiv_core::traits::blob::BlobStore;
use arkiv_database::repositories::node::NodeRepository;
use arkiv_entity::node::{NewNode, Node, NodeKind};
use sqlx::{Postgres, Transaction};

use crate::context::RequestContext;
use crate::file::service::{FileService, validate_node_name};

/// One uploaded file's name, reported MIME type, and content.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-reported file name (including extension).
    pub name: String,
    /// Client-reported MIME type.
    pub mime_type: Option<String>,
    /// File content.
    pub data: Bytes,
}

/// One entry in an upload tree: a raw file or a nested subfolder.
#[derive(Debug, Clone)]
pub enum UploadEntry {
    /// A raw uploaded file.
    File(UploadedFile),
    /// A subfolder and its contents.
    Folder(UploadTree),
}

/// A nested mapping of names to upload entries, in submission order.
#[derive(Debug, Clone, Default)]
pub struct UploadTree {
    entries: Vec<(String, UploadEntry)>,
}

impl UploadTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries in submission order.
    pub fn entries(&self) -> &[(String, UploadEntry)] {
        &self.entries
    }

    /// Inserts a file at the given folder path within the tree, creating
    /// intermediate folder entries as needed.
    ///
    /// `segments` is the full entry path: zero or more folder names
    /// followed by the file's name as the last segment.
    pub fn insert_file(&mut self, segments: &[&str], file: UploadedFile) -> Result<(), AppError> {
        let (name, folders) = segments
            .split_last()
            .ok_or_else(|| AppError::validation("Empty upload tree entry"))?;

        let mut tree = self;
        for folder in folders {
            tree = tree.child_folder(folder)?;
        }

        if tree.entries.iter().any(|(n, _)| n == name) {
            return Err(AppError::validation_field(
                "files",
                format!("Duplicate entry \"{name}\" in upload"),
            ));
        }
        tree.entries
            .push(((*name).to_string(), UploadEntry::File(file)));
        Ok(())
    }

    /// Finds or creates a direct child folder entry.
    fn child_folder(&mut self, name: &str) -> Result<&mut UploadTree, AppError> {
        let position = self.entries.iter().position(|(n, _)| n == name);
        let index = match position {
            Some(i) => i,
            None => {
                self.entries
                    .push((name.to_string(), UploadEntry::Folder(UploadTree::new())));
                self.entries.len() - 1
            }
        };

        match &mut self.entries[index].1 {
            UploadEntry::Folder(tree) => Ok(tree),
            UploadEntry::File(_) => Err(AppError::validation_field(
                "files",
                format!("Upload entry \"{name}\" is both a file and a folder"),
            )),
        }
    }
}

/// Handles flat file uploads and whole-directory-tree uploads.
#[derive(Clone)]
pub struct UploadService {
    /// Node repository.
    nodes: Arc<NodeRepository>,
    /// Blob store collaborator.
    blobs: Arc<dyn BlobStore>,
    /// File service, for target folder resolution.
    files: FileService,
    /// Storage configuration.
    config: StorageConfig,
}

impl std::fmt::Debug for UploadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadService").finish()
    }
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        nodes: Arc<NodeRepository>,
        blobs: Arc<dyn BlobStore>,
        files: FileService,
        config: StorageConfig,
    ) -> Self {
        Self {
            nodes,
            blobs,
            files,
            config,
        }
    }

    /// Uploads a flat list of files into one target folder.
    ///
    /// A duplicate live file name anywhere in the batch rejects the whole
    /// call.
    pub async fn upload_files(
        &self,
        ctx: &RequestContext,
        parent_id: Option<Uuid>,
        files: Vec<UploadedFile>,
    ) -> Result<Vec<Node>, AppError> {
        if files.is_empty() {
            return Err(AppError::validation_field("files", "No files supplied"));
        }
        self.check_sizes(files.iter())?;

        let mut tx = self.nodes.begin().await?;
        self.nodes.lock_owner_tree(&mut tx, ctx.user_id).await?;

        let parent = self.files.resolve_parent(ctx, parent_id).await?;

        let mut created = Vec::with_capacity(files.len());
        for file in files {
            created.push(self.store_file(ctx, &mut tx, &parent, file).await?);
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit upload", e)
        })?;

        info!(user_id = %ctx.user_id, parent_id = %parent.id, count = created.len(), "Files uploaded");

        Ok(created)
    }

    /// Uploads a nested directory tree into one target folder.
    ///
    /// Folder entries reuse an existing live folder of the same name;
    /// only folders this call creates are duplicate-checked. File entries
    /// reject duplicates exactly like flat uploads.
    pub async fn upload_tree(
        &self,
        ctx: &RequestContext,
        parent_id: Option<Uuid>,
        tree: UploadTree,
    ) -> Result<Vec<Node>, AppError> {
        if tree.is_empty() {
            return Err(AppError::validation_field("files", "No files supplied"));
        }
        self.check_tree_sizes(&tree)?;

        let mut tx = self.nodes.begin().await?;
        self.nodes.lock_owner_tree(&mut tx, ctx.user_id).await?;

        let parent = self.files.resolve_parent(ctx, parent_id).await?;

        let mut created = Vec::new();
        self.store_tree(ctx, &mut tx, &parent, &tree, &mut created)
            .await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit tree upload", e)
        })?;

        info!(user_id = %ctx.user_id, parent_id = %parent.id, count = created.len(), "Tree uploaded");

        Ok(created)
    }

    /// Recursively stores a tree's entries under `parent`.
    fn store_tree<'a>(
        &'a self,
        ctx: &'a RequestContext,
        tx: &'a mut Transaction<'static, Postgres>,
        parent: &'a Node,
        tree: &'a UploadTree,
        created: &'a mut Vec<Node>,
    ) -> BoxFuture<'a, Result<(), AppError>> {
        async move {
            for (name, entry) in tree.entries() {
                match entry {
                    UploadEntry::File(file) => {
                        let node = self.store_file(ctx, tx, parent, file.clone()).await?;
                        created.push(node);
                    }
                    UploadEntry::Folder(subtree) => {
                        let name = validate_node_name(name, "files")?;
                        let folder = match self
                            .nodes
                            .find_child_folder(tx, parent.id, name)
                            .await?
                        {
                            // An existing folder is reused silently; only
                            // freshly created folders are duplicate-checked.
                            Some(existing) => existing,
                            None => {
                                let folder = self
                                    .nodes
                                    .append_child(tx, parent, &NewNode::folder(name))
                                    .await?;
                                created.push(folder.clone());
                                folder
                            }
                        };
                        self.store_tree(ctx, tx, &folder, subtree, created).await?;
                    }
                }
            }
            Ok(())
        }
        .boxed()
    }

    /// Stores one file's bytes and appends its node under `parent`.
    async fn store_file(
        &self,
        ctx: &RequestContext,
        tx: &mut Transaction<'static, Postgres>,
        parent: &Node,
        file: UploadedFile,
    ) -> Result<Node, AppError> {
        let name = validate_node_name(&file.name, "files")?;

        if self
            .nodes
            .sibling_exists(tx, parent.id, name, NodeKind::File)
            .await?
        {
            return Err(AppError::validation_field(
                "files",
                format!("File \"{name}\" already exists in this directory."),
            ));
        }

        let directory = format!("files/{}", ctx.user_id);
        let size_bytes = file.data.len() as i64;
        let blob_path = self.blobs.store(&directory, name, file.data).await?;

        self.nodes
            .append_child(
                tx,
                parent,
                &NewNode::file(name, file.mime_type, size_bytes, blob_path),
            )
            .await
    }

    /// Rejects any file over the configured size limit.
    fn check_sizes<'a>(
        &self,
        files: impl Iterator<Item = &'a UploadedFile>,
    ) -> Result<(), AppError> {
        for file in files {
            if file.data.len() as u64 > self.config.max_upload_size_bytes {
                return Err(AppError::validation_field(
                    "files",
                    format!(
                        "File \"{}\" exceeds the maximum upload size of {} bytes",
                        file.name, self.config.max_upload_size_bytes
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Size-checks every file entry in a tree.
    fn check_tree_sizes(&self, tree: &UploadTree) -> Result<(), AppError> {
        for (_, entry) in tree.entries() {
            match entry {
                UploadEntry::File(file) => self.check_sizes(std::iter::once(file))?,
                UploadEntry::Folder(subtree) => self.check_tree_sizes(subtree)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> UploadedFile {
        UploadedFile {
            name: name.to_string(),
            mime_type: Some("text/plain".into()),
            data: Bytes::from_static(b"content"),
        }
    }

    #[test]
    fn test_insert_file_at_root_of_tree() {
        let mut tree = UploadTree::new();
        tree.insert_file(&["b.txt"], file("b.txt")).expect("insert");

        assert_eq!(tree.entries().len(), 1);
        assert!(matches!(tree.entries()[0].1, UploadEntry::File(_)));
    }

    #[test]
    fn test_insert_nested_creates_intermediate_folders() {
        let mut tree = UploadTree::new();
        tree.insert_file(&["docs", "a.txt"], file("a.txt"))
            .expect("insert nested");
        tree.insert_file(&["b.txt"], file("b.txt")).expect("insert flat");

        assert_eq!(tree.entries().len(), 2);
        let (name, entry) = &tree.entries()[0];
        assert_eq!(name, "docs");
        match entry {
            UploadEntry::Folder(sub) => {
                assert_eq!(sub.entries().len(), 1);
                assert_eq!(sub.entries()[0].0, "a.txt");
            }
            UploadEntry::File(_) => panic!("docs should be a folder"),
        }
    }

    #[test]
    fn test_sibling_files_share_a_folder_entry() {
        let mut tree = UploadTree::new();
        tree.insert_file(&["docs", "a.txt"], file("a.txt")).expect("a");
        tree.insert_file(&["docs", "b.txt"], file("b.txt")).expect("b");

        assert_eq!(tree.entries().len(), 1);
        match &tree.entries()[0].1 {
            UploadEntry::Folder(sub) => assert_eq!(sub.entries().len(), 2),
            UploadEntry::File(_) => panic!("docs should be a folder"),
        }
    }

    #[test]
    fn test_duplicate_file_entry_is_rejected() {
        let mut tree = UploadTree::new();
        tree.insert_file(&["a.txt"], file("a.txt")).expect("first");
        let err = tree.insert_file(&["a.txt"], file("a.txt")).expect_err("dup");
        assert_eq!(err.field.as_deref(), Some("files"));
    }

    #[test]
    fn test_entry_cannot_be_both_file_and_folder() {
        let mut tree = UploadTree::new();
        tree.insert_file(&["docs"], file("docs")).expect("file");
        let err = tree
            .insert_file(&["docs", "a.txt"], file("a.txt"))
            .expect_err("conflict");
        assert_eq!(err.field.as_deref(), Some("files"));
    }

    #[test]
    fn test_empty_segments_rejected() {
        let mut tree = UploadTree::new();
        assert!(tree.insert_file(&[], file("x")).is_err());
    }
}
