//! Collection inspection and maintenance commands.

use clap::{Args, Subcommand};
use dialoguer::Confirm;
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use shelf_core::config::AppConfig;
use shelf_core::error::AppError;
use shelf_core::types::{IngestMode, ReadScope};
use shelf_entity::{CollectionSummary, ParentFilter, StructureNode};
use shelf_service::{ListingService, RequestContext, TreeService};

use crate::output::{self, OutputFormat};

/// Arguments for collection commands
#[derive(Debug, Args)]
pub struct CollectionArgs {
    /// Collection subcommand
    #[command(subcommand)]
    pub command: CollectionCommand,
}

/// Collection subcommands
#[derive(Debug, Subcommand)]
pub enum CollectionCommand {
    /// List a user's collections
    List {
        /// Owning user ID
        #[arg(short, long)]
        user: Uuid,
        /// Only direct children of this collection
        #[arg(short, long)]
        parent: Option<Uuid>,
        /// Only root collections
        #[arg(long, conflicts_with = "parent")]
        roots: bool,
        /// Compute "fully read" over whole subtrees
        #[arg(long)]
        recursive: bool,
    },
    /// Show a user's collection tree
    Tree {
        /// Owning user ID
        #[arg(short, long)]
        user: Uuid,
        /// Start from this collection
        #[arg(short, long)]
        root: Option<Uuid>,
        /// Max depth
        #[arg(short, long)]
        depth: Option<u32>,
    },
    /// Delete a collection with its whole subtree
    Delete {
        /// Owning user ID
        #[arg(short, long)]
        user: Uuid,
        /// Collection ID
        #[arg(short, long)]
        id: Uuid,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Import a folder structure from a JSON file
    Import {
        /// Owning user ID
        #[arg(short, long)]
        user: Uuid,
        /// Path to the structure JSON
        #[arg(short, long)]
        file: String,
        /// Ingestion mode: create, append or overwrite
        #[arg(short, long, default_value = "append")]
        mode: IngestMode,
        /// Attach the structure under this collection
        #[arg(short, long)]
        parent: Option<Uuid>,
    },
}

/// Collection display row
#[derive(Debug, Serialize, Tabled)]
struct CollectionRow {
    /// Collection ID
    id: String,
    /// Name
    name: String,
    /// Parent
    parent: String,
    /// Comics
    comics: u64,
    /// Children
    children: u64,
    /// Fully read
    fully_read: bool,
    /// Rating
    rating: String,
}

impl From<CollectionSummary> for CollectionRow {
    fn from(summary: CollectionSummary) -> Self {
        let collection = summary.collection;
        Self {
            id: collection.id.to_string(),
            name: collection.name,
            parent: collection
                .parent_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string()),
            comics: summary.comic_count,
            children: summary.child_count,
            fully_read: summary.fully_read,
            rating: collection
                .rating
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Execute collection commands
pub async fn execute(
    args: &CollectionArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = super::open_store(config).await?;
    let scope = config.tree.read_scope;

    match &args.command {
        CollectionCommand::List {
            user,
            parent,
            roots,
            recursive,
        } => {
            let listing = ListingService::new(store, scope);
            let filter = match (parent, roots) {
                (Some(id), _) => ParentFilter::Parent(*id),
                (None, true) => ParentFilter::Root,
                (None, false) => ParentFilter::All,
            };
            let scope = recursive.then_some(ReadScope::Recursive);

            let summaries = listing
                .list_collections(&RequestContext::new(*user), filter, scope)
                .await?;
            let rows: Vec<CollectionRow> = summaries.into_iter().map(CollectionRow::from).collect();
            output::print_list(&rows, format);
        }
        CollectionCommand::Tree { user, root, depth } => {
            let listing = ListingService::new(store, scope);
            let forest = listing.tree(&RequestContext::new(*user), *root).await?;
            output::print_tree(&forest, *depth, format);
        }
        CollectionCommand::Delete { user, id, yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!(
                        "Delete collection {id} with all sub-collections and comics?"
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Prompt failed: {e}")))?;

                if !confirmed {
                    output::print_warning("Cancelled.");
                    return Ok(());
                }
            }

            let tree = TreeService::new(store, scope);
            let summary = tree
                .delete_subtree(&RequestContext::new(*user), *id)
                .await?;

            match format {
                OutputFormat::Json => output::print_item(&summary, format),
                OutputFormat::Table => output::print_success(&format!(
                    "Deleted {} collection(s) and {} comic(s)",
                    summary.collections_deleted, summary.comics_deleted
                )),
            }
        }
        CollectionCommand::Import {
            user,
            file,
            mode,
            parent,
        } => {
            let raw = tokio::fs::read_to_string(file)
                .await
                .map_err(|e| AppError::validation(format!("Cannot read '{file}': {e}")))?;
            let structure: StructureNode = serde_json::from_str(&raw)?;

            let tree = TreeService::new(store, scope);
            let summary = tree
                .ingest(&RequestContext::new(*user), structure, *mode, *parent)
                .await?;

            match format {
                OutputFormat::Json => output::print_item(&summary, format),
                OutputFormat::Table => {
                    output::print_success(&format!(
                        "Imported '{}' ({})",
                        summary.root.name, summary.mode
                    ));
                    output::print_kv("Root", &summary.root.id.to_string());
                    output::print_kv("Created", &summary.collections_created.to_string());
                    output::print_kv("Matched", &summary.collections_matched.to_string());
                    output::print_kv("Comics added", &summary.comics_inserted.to_string());
                    output::print_kv("Comics removed", &summary.comics_removed.to_string());
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use shelf_entity::{Collection, CreateCollection};

    use super::*;

    #[test]
    fn test_row_from_summary() {
        let collection = Collection::from_create(
            CreateCollection::named(Uuid::new_v4(), None, "Marvel"),
            Utc::now(),
        );
        let row = CollectionRow::from(CollectionSummary {
            collection,
            fully_read: true,
            comic_count: 3,
            child_count: 1,
        });
        assert_eq!(row.name, "Marvel");
        assert_eq!(row.parent, "-");
        assert_eq!(row.rating, "-");
        assert!(row.fully_read);
    }
}
