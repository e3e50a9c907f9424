//! Resource repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;

use drivehub_core::error::{AppError, ErrorKind};
use drivehub_core::result::AppResult;
use drivehub_core::types::{PageRequest, ResourceId, UserId};
use drivehub_entity::resource::{NewResource, Resource, ResourceRow};

use super::{PurgeOutcome, ResourceStore};
use crate::query::{
    FieldSpec, ListingQuery, ListingSpec, Operator, Predicate, escape_like, transform,
};

const SIBLING_NAME_KEY: &str = "resources_active_sibling_name_key";
const PARENT_FKEY: &str = "resources_parent_id_fkey";

const INSERT_RESOURCE: &str = "INSERT INTO resources \
     (id, owner_id, parent_id, name, is_folder, storage_path, mime_type, size, content_hash) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *";

const SUBTREE_IDS: &str = "WITH RECURSIVE subtree AS ( \
        SELECT id FROM resources WHERE id = $1 AND owner_id = $2 \
        UNION ALL \
        SELECT r.id FROM resources r INNER JOIN subtree s ON r.parent_id = s.id \
     )";

/// Listing over `resources`. `owner_id` scoping and the `active` default are added per call.
pub const RESOURCE_LISTING: ListingSpec = ListingSpec {
    select: "SELECT * FROM resources",
    count: "SELECT COUNT(*) FROM resources",
    fields: &[
        ("name", FieldSpec::new("name", Operator::Contains, transform::text)),
        ("isFolder", FieldSpec::new("is_folder", Operator::Eq, transform::boolean)),
        ("parentId", FieldSpec::new("parent_id", Operator::Eq, transform::uuid_or_null)),
        ("mimeType", FieldSpec::new("mime_type", Operator::Eq, transform::text)),
        ("status", FieldSpec::new("status::text", Operator::Eq, transform::lowercase)),
        ("createdAt", FieldSpec::new("created_at", Operator::SameDay, transform::day_start)),
    ],
    sort_columns: &[
        ("name", "name"),
        ("size", "size"),
        ("isFolder", "is_folder"),
        ("mimeType", "mime_type"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ],
    default_sort: "createdAt",
    tie_breaker: Some("id"),
};

/// PostgreSQL-backed [`ResourceStore`].
#[derive(Debug, Clone)]
pub struct ResourceRepository {
    pool: PgPool,
}

impl ResourceRepository {
    /// Create a new resource repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn insert_query(new: &NewResource) -> QueryAs<'_, Postgres, ResourceRow, PgArguments> {
    sqlx::query_as::<_, ResourceRow>(INSERT_RESOURCE)
        .bind(new.id)
        .bind(new.owner_id)
        .bind(new.parent_id)
        .bind(&new.name)
        .bind(new.is_folder)
        .bind(&new.storage_path)
        .bind(&new.mime_type)
        .bind(new.size)
        .bind(&new.content_hash)
}

/// Map constraint violations on `resources` into domain errors.
fn map_write_error(e: sqlx::Error, name: Option<&str>, context: &str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(SIBLING_NAME_KEY) => {
            AppError::file_already_exists(match name {
                Some(name) => format!("A resource named '{name}' already exists here"),
                None => "A resource with the same name already exists here".to_string(),
            })
        }
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(PARENT_FKEY) => {
            AppError::parent_not_found("Parent folder no longer exists")
        }
        _ => AppError::with_source(ErrorKind::Database, context.to_string(), e),
    }
}

fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}

fn into_resources(rows: Vec<ResourceRow>) -> AppResult<Vec<Resource>> {
    rows.into_iter().map(Resource::try_from).collect()
}

/// Base predicates for an owner's listing. Active rows only unless the
/// request filters on `status` itself.
fn listing_base(owner: UserId, request: &PageRequest) -> Vec<Predicate> {
    let mut base = vec![Predicate::eq("owner_id", owner.into_uuid())];
    if !request.filters.iter().any(|f| f.id == "status") {
        base.push(Predicate::eq("status::text", "active"));
    }
    base
}

#[async_trait]
impl ResourceStore for ResourceRepository {
    async fn find_by_id(&self, id: ResourceId) -> AppResult<Option<Resource>> {
        sqlx::query_as::<_, ResourceRow>("SELECT * FROM resources WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find resource"))?
            .map(Resource::try_from)
            .transpose()
    }

    async fn find_owned(&self, owner: UserId, id: ResourceId) -> AppResult<Option<Resource>> {
        sqlx::query_as::<_, ResourceRow>("SELECT * FROM resources WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find resource"))?
            .map(Resource::try_from)
            .transpose()
    }

    async fn find_active(&self, owner: UserId, id: ResourceId) -> AppResult<Option<Resource>> {
        sqlx::query_as::<_, ResourceRow>(
            "SELECT * FROM resources WHERE id = $1 AND owner_id = $2 AND status = 'active'",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find resource"))?
        .map(Resource::try_from)
        .transpose()
    }

    async fn find_owned_folder(
        &self,
        owner: UserId,
        id: ResourceId,
    ) -> AppResult<Option<Resource>> {
        sqlx::query_as::<_, ResourceRow>(
            "SELECT * FROM resources \
             WHERE id = $1 AND owner_id = $2 AND is_folder AND status = 'active'",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find parent folder"))?
        .map(Resource::try_from)
        .transpose()
    }

    async fn sibling_names_with_prefix(
        &self,
        owner: UserId,
        parent: Option<ResourceId>,
        prefix: &str,
    ) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT name FROM resources \
             WHERE owner_id = $1 AND parent_id IS NOT DISTINCT FROM $2 \
               AND status = 'active' AND name LIKE $3",
        )
        .bind(owner)
        .bind(parent)
        .bind(format!("{}%", escape_like(prefix)))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list sibling names"))
    }

    async fn find_collision(
        &self,
        owner: UserId,
        parent: Option<ResourceId>,
        name: &str,
        hash: &str,
    ) -> AppResult<Option<Resource>> {
        sqlx::query_as::<_, ResourceRow>(
            "SELECT * FROM resources \
             WHERE owner_id = $1 AND parent_id IS NOT DISTINCT FROM $2 AND status = 'active' \
               AND (name = $3 OR (NOT is_folder AND content_hash = $4)) \
             LIMIT 1",
        )
        .bind(owner)
        .bind(parent)
        .bind(name)
        .bind(hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to check for existing file"))?
        .map(Resource::try_from)
        .transpose()
    }

    async fn name_taken(
        &self,
        owner: UserId,
        parent: Option<ResourceId>,
        name: &str,
        excluding: Option<ResourceId>,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                SELECT 1 FROM resources \
                WHERE owner_id = $1 AND parent_id IS NOT DISTINCT FROM $2 \
                  AND status = 'active' AND name = $3 AND id IS DISTINCT FROM $4 \
             )",
        )
        .bind(owner)
        .bind(parent)
        .bind(name)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to check sibling name"))
    }

    async fn insert(&self, new: &NewResource) -> AppResult<Resource> {
        let row = insert_query(new)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, Some(&new.name), "Failed to insert resource"))?;
        Resource::try_from(row)
    }

    async fn insert_file_charging_quota(&self, new: &NewResource) -> AppResult<Resource> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let row = insert_query(new)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, Some(&new.name), "Failed to insert file"))?;

        let charged = sqlx::query(
            "UPDATE users SET used_storage = used_storage + $2, updated_at = NOW() \
             WHERE id = $1 AND used_storage + $2 <= storage_quota",
        )
        .bind(new.owner_id)
        .bind(new.size)
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to update storage usage"))?;

        if charged.rows_affected() == 0 {
            return Err(AppError::quota_exceeded(format!(
                "Storing {} more bytes would exceed the storage quota",
                new.size
            )));
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit upload"))?;
        Resource::try_from(row)
    }

    async fn rename(&self, owner: UserId, id: ResourceId, name: &str) -> AppResult<Resource> {
        let row = sqlx::query_as::<_, ResourceRow>(
            "UPDATE resources SET name = $3, updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 AND status = 'active' RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, Some(name), "Failed to rename resource"))?
        .ok_or_else(|| AppError::resource_not_found(format!("Resource {id} not found")))?;
        Resource::try_from(row)
    }

    async fn ancestor_ids(&self, id: ResourceId) -> AppResult<Vec<ResourceId>> {
        sqlx::query_scalar::<_, ResourceId>(
            "WITH RECURSIVE chain AS ( \
                SELECT id, parent_id, 0 AS depth FROM resources WHERE id = $1 \
                UNION ALL \
                SELECT r.id, r.parent_id, c.depth + 1 \
                FROM resources r INNER JOIN chain c ON r.id = c.parent_id \
             ) SELECT id FROM chain ORDER BY depth ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to resolve ancestors"))
    }

    async fn subtree(&self, owner: UserId, id: ResourceId) -> AppResult<Vec<Resource>> {
        let rows = sqlx::query_as::<_, ResourceRow>(
            "WITH RECURSIVE subtree AS ( \
                SELECT r.*, 0 AS depth FROM resources r WHERE r.id = $1 AND r.owner_id = $2 \
                UNION ALL \
                SELECT r.*, s.depth + 1 FROM resources r INNER JOIN subtree s ON r.parent_id = s.id \
             ) \
             SELECT id, owner_id, parent_id, name, is_folder, storage_path, mime_type, size, \
                    content_hash, status, deleted_at, created_at, updated_at \
             FROM subtree ORDER BY depth ASC, created_at ASC",
        )
        .bind(id)
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load subtree"))?;
        into_resources(rows)
    }

    async fn relocate(
        &self,
        owner: UserId,
        id: ResourceId,
        new_parent: Option<ResourceId>,
        old_prefix: &str,
        new_prefix: &str,
    ) -> AppResult<Resource> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        sqlx::query(
            "UPDATE resources \
             SET storage_path = $3 || substr(storage_path, length($2) + 1), updated_at = NOW() \
             WHERE owner_id = $1 AND (storage_path = $2 OR storage_path LIKE $4)",
        )
        .bind(owner)
        .bind(old_prefix)
        .bind(new_prefix)
        .bind(format!("{}/%", escape_like(old_prefix)))
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to rewrite storage paths"))?;

        let row = sqlx::query_as::<_, ResourceRow>(
            "UPDATE resources SET parent_id = $3, updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(new_parent)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, None, "Failed to move resource"))?
        .ok_or_else(|| AppError::resource_not_found(format!("Resource {id} not found")))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit move"))?;
        Resource::try_from(row)
    }

    async fn soft_delete_subtree(
        &self,
        owner: UserId,
        id: ResourceId,
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let sql = format!(
            "{SUBTREE_IDS} UPDATE resources \
             SET status = 'deleted', deleted_at = $3, updated_at = NOW() \
             WHERE id IN (SELECT id FROM subtree) AND status = 'active'"
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(owner)
            .bind(at)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected())
            .map_err(db_error("Failed to delete resource"))
    }

    async fn restore_subtree(
        &self,
        owner: UserId,
        id: ResourceId,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let sql = format!(
            "{SUBTREE_IDS} UPDATE resources \
             SET status = 'active', deleted_at = NULL, updated_at = NOW() \
             WHERE id IN (SELECT id FROM subtree) AND status = 'deleted' AND deleted_at = $3"
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(owner)
            .bind(deleted_at)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| map_write_error(e, None, "Failed to restore resource"))
    }

    async fn archive(&self, owner: UserId, id: ResourceId) -> AppResult<Resource> {
        let row = sqlx::query_as::<_, ResourceRow>(
            "UPDATE resources SET status = 'archived', updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 AND status = 'active' RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to archive resource"))?
        .ok_or_else(|| AppError::resource_not_found(format!("Resource {id} not found")))?;
        Resource::try_from(row)
    }

    async fn unarchive(&self, owner: UserId, id: ResourceId) -> AppResult<Resource> {
        let row = sqlx::query_as::<_, ResourceRow>(
            "UPDATE resources SET status = 'active', updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 AND status = 'archived' RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, None, "Failed to unarchive resource"))?
        .ok_or_else(|| AppError::resource_not_found(format!("Resource {id} not found")))?;
        Resource::try_from(row)
    }

    async fn list(
        &self,
        owner: UserId,
        request: &PageRequest,
    ) -> AppResult<(Vec<Resource>, Option<u64>)> {
        let ListingQuery { mut select, count } =
            RESOURCE_LISTING.build(request, listing_base(owner, request))?;

        let rows = select
            .build_query_as::<ResourceRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list resources"))?;

        let total = match count {
            Some(mut count) => {
                let total: i64 = count
                    .build_query_scalar()
                    .fetch_one(&self.pool)
                    .await
                    .map_err(db_error("Failed to count resources"))?;
                Some(total.max(0) as u64)
            }
            None => None,
        };

        Ok((into_resources(rows)?, total))
    }

    async fn purge_subtree(&self, owner: UserId, id: ResourceId) -> AppResult<PurgeOutcome> {
        let removed = self.subtree(owner, id).await?;
        if removed.is_empty() {
            return Err(AppError::resource_not_found(format!("Resource {id} not found")));
        }
        let freed_bytes: i64 = removed.iter().filter(|r| r.is_file()).map(|r| r.size).sum();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        sqlx::query("DELETE FROM resources WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to purge resource"))?;

        sqlx::query(
            "UPDATE users SET used_storage = GREATEST(used_storage - $2, 0), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(owner)
        .bind(freed_bytes)
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to release storage usage"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit purge"))?;

        Ok(PurgeOutcome {
            removed,
            freed_bytes,
        })
    }
}
