//! PostgreSQL Repository Implementations
//!
//! `PgStore` implements both repositories over one pool so that writes which
//! touch accounts and championships share a transaction.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{AccountId, ChampionshipId};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::entity::account::{Account, AccountChanges};
use crate::domain::entity::championship::{
    Category, Championship, ChampionshipFilter, ChampionshipPatch, Stage,
};
use crate::domain::repository::{AccountRepository, ChampionshipRepository};
use crate::domain::service::ownership::authorize_mutation;
use crate::domain::value_object::{
    AccountPassword, Amount, DisplayName, Email, ResetTicket,
};
use crate::error::{GridboardError, GridboardResult};

const ACCOUNT_SELECT: &str = r#"
    SELECT
        a.account_id,
        a.identity,
        a.display_name,
        a.password_hash,
        a.avatar,
        a.reset_token_hash,
        a.reset_token_expires_at,
        a.created_at,
        a.updated_at,
        COALESCE(
            (SELECT array_agg(c.championship_id ORDER BY c.seq)
             FROM account_created_championships c
             WHERE c.account_id = a.account_id),
            '{}'::uuid[]
        ) AS created_championships,
        COALESCE(
            (SELECT array_agg(r.championship_id ORDER BY r.seq)
             FROM championship_registrations r
             WHERE r.account_id = a.account_id),
            '{}'::uuid[]
        ) AS registered_championships
    FROM accounts a
"#;

const CHAMPIONSHIP_SELECT: &str = r#"
    SELECT
        championship_id,
        creator_id,
        name,
        organizer,
        contact_phone,
        contact_email,
        state,
        city,
        venue,
        description,
        cover_image,
        logo_image,
        rules_url,
        registration_fee_cents,
        headline_date,
        headline_date_derived,
        created_at,
        updated_at
    FROM championships
"#;

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_account(
        conn: &mut PgConnection,
        account_id: &AccountId,
    ) -> GridboardResult<Option<Account>> {
        let sql = format!("{} WHERE a.account_id = $1", ACCOUNT_SELECT);
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(account_id.as_uuid())
            .fetch_optional(&mut *conn)
            .await?;

        row.map(|r| r.into_account()).transpose()
    }

    /// Lock the account row for the rest of the transaction
    async fn lock_account(
        conn: &mut PgConnection,
        account_id: &AccountId,
        lock: &str,
    ) -> GridboardResult<bool> {
        let sql = format!(
            "SELECT account_id FROM accounts WHERE account_id = $1 {}",
            lock
        );
        let found = sqlx::query_scalar::<_, Uuid>(&sql)
            .bind(account_id.as_uuid())
            .fetch_optional(&mut *conn)
            .await?;

        Ok(found.is_some())
    }

    async fn fetch_championships(
        conn: &mut PgConnection,
        rows: Vec<ChampionshipRow>,
    ) -> GridboardResult<Vec<Championship>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.championship_id).collect();

        let stage_rows = sqlx::query_as::<_, StageRow>(
            r#"
            SELECT
                championship_id,
                position,
                name,
                stage_date,
                location,
                track_layout,
                price_cents,
                image
            FROM championship_stages
            WHERE championship_id = ANY($1)
            ORDER BY championship_id, position
            "#,
        )
        .bind(&ids)
        .fetch_all(&mut *conn)
        .await?;

        let category_rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT
                championship_id,
                position,
                name,
                capacity
            FROM championship_categories
            WHERE championship_id = ANY($1)
            ORDER BY championship_id, position
            "#,
        )
        .bind(&ids)
        .fetch_all(&mut *conn)
        .await?;

        let mut stages: HashMap<Uuid, Vec<Stage>> = HashMap::new();
        for row in stage_rows {
            stages
                .entry(row.championship_id)
                .or_default()
                .push(row.into_stage()?);
        }

        let mut categories: HashMap<Uuid, Vec<Category>> = HashMap::new();
        for row in category_rows {
            categories
                .entry(row.championship_id)
                .or_default()
                .push(row.into_category()?);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let id = row.championship_id;
                row.into_championship(
                    stages.remove(&id).unwrap_or_default(),
                    categories.remove(&id).unwrap_or_default(),
                )
            })
            .collect())
    }

    async fn insert_stages(
        conn: &mut PgConnection,
        championship_id: &ChampionshipId,
        stages: &[Stage],
    ) -> GridboardResult<()> {
        for stage in stages {
            sqlx::query(
                r#"
                INSERT INTO championship_stages (
                    championship_id,
                    position,
                    name,
                    stage_date,
                    location,
                    track_layout,
                    price_cents,
                    image
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(championship_id.as_uuid())
            .bind(db_position(stage.position)?)
            .bind(&stage.name)
            .bind(stage.date)
            .bind(&stage.location)
            .bind(&stage.track_layout)
            .bind(stage.price.cents())
            .bind(&stage.image)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    async fn insert_categories(
        conn: &mut PgConnection,
        championship_id: &ChampionshipId,
        categories: &[Category],
    ) -> GridboardResult<()> {
        for category in categories {
            let capacity = i32::try_from(category.capacity).map_err(|_| {
                GridboardError::validation(format!(
                    "Category '{}' capacity is too large",
                    category.name
                ))
            })?;

            sqlx::query(
                r#"
                INSERT INTO championship_categories (
                    championship_id,
                    position,
                    name,
                    capacity
                ) VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(championship_id.as_uuid())
            .bind(db_position(category.position)?)
            .bind(&category.name)
            .bind(capacity)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgStore {
    async fn create(&self, account: &Account) -> GridboardResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id,
                identity,
                display_name,
                password_hash,
                avatar,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.identity.as_str())
        .bind(account.display_name.as_str())
        .bind(account.password.as_phc_string())
        .bind(&account.avatar)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(identity_conflict)?;

        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> GridboardResult<Option<Account>> {
        let mut conn = self.pool.acquire().await?;
        Self::fetch_account(&mut conn, account_id).await
    }

    async fn find_by_identity(&self, identity: &Email) -> GridboardResult<Option<Account>> {
        let sql = format!("{} WHERE a.identity = $1", ACCOUNT_SELECT);
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(identity.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn update(
        &self,
        account_id: &AccountId,
        changes: &AccountChanges,
    ) -> GridboardResult<Account> {
        let mut conn = self.pool.acquire().await?;

        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE accounts SET
                display_name = COALESCE($2, display_name),
                identity = COALESCE($3, identity),
                avatar = COALESCE($4, avatar),
                updated_at = $5
            WHERE account_id = $1
            RETURNING account_id
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(changes.display_name.as_ref().map(|n| n.as_str()))
        .bind(changes.identity.as_ref().map(|e| e.as_str()))
        .bind(&changes.avatar)
        .bind(Utc::now())
        .fetch_optional(&mut *conn)
        .await
        .map_err(identity_conflict)?;

        if updated.is_none() {
            return Err(GridboardError::AccountNotFound);
        }

        Self::fetch_account(&mut conn, account_id)
            .await?
            .ok_or(GridboardError::AccountNotFound)
    }

    async fn store_reset_ticket(
        &self,
        account_id: &AccountId,
        ticket: &ResetTicket,
    ) -> GridboardResult<()> {
        let affected = sqlx::query(
            r#"
            UPDATE accounts SET
                reset_token_hash = $2,
                reset_token_expires_at = $3,
                updated_at = now()
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(&ticket.token_hash)
        .bind(ticket.expires_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(GridboardError::AccountNotFound);
        }
        Ok(())
    }

    async fn consume_reset_ticket(
        &self,
        token_hash: &str,
        new_password: &AccountPassword,
        now: DateTime<Utc>,
    ) -> GridboardResult<Option<Account>> {
        let mut conn = self.pool.acquire().await?;

        // Match, expiry check, password swap and ticket clear in one statement
        let consumed = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE accounts SET
                password_hash = $2,
                reset_token_hash = NULL,
                reset_token_expires_at = NULL,
                updated_at = $3
            WHERE reset_token_hash = $1 AND reset_token_expires_at > $3
            RETURNING account_id
            "#,
        )
        .bind(token_hash)
        .bind(new_password.as_phc_string())
        .bind(now)
        .fetch_optional(&mut *conn)
        .await?;

        match consumed {
            Some(account_id) => {
                Self::fetch_account(&mut conn, &AccountId::from_uuid(account_id)).await
            }
            None => Ok(None),
        }
    }

    async fn purge_expired_reset_tickets(&self, now: DateTime<Utc>) -> GridboardResult<u64> {
        let purged = sqlx::query(
            r#"
            UPDATE accounts SET
                reset_token_hash = NULL,
                reset_token_expires_at = NULL
            WHERE reset_token_expires_at <= $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?
        .rows_affected();

        tracing::info!(tickets_purged = purged, "Purged expired reset tickets");

        Ok(purged)
    }

    async fn add_registration(
        &self,
        account_id: &AccountId,
        championship_id: &ChampionshipId,
    ) -> GridboardResult<Account> {
        let mut tx = self.pool.begin().await?;

        if !Self::lock_account(&mut tx, account_id, "FOR SHARE").await? {
            return Err(GridboardError::AccountNotFound);
        }

        let championship_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM championships WHERE championship_id = $1)",
        )
        .bind(championship_id.as_uuid())
        .fetch_one(&mut *tx)
        .await?;

        if !championship_exists {
            return Err(GridboardError::ChampionshipNotFound);
        }

        sqlx::query(
            r#"
            INSERT INTO championship_registrations (account_id, championship_id)
            VALUES ($1, $2)
            ON CONFLICT (account_id, championship_id) DO NOTHING
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(championship_id.as_uuid())
        .execute(&mut *tx)
        .await?;

        let account = Self::fetch_account(&mut tx, account_id)
            .await?
            .ok_or(GridboardError::AccountNotFound)?;

        tx.commit().await?;

        Ok(account)
    }
}

// ============================================================================
// Championship Repository Implementation
// ============================================================================

impl ChampionshipRepository for PgStore {
    async fn create_championship(&self, championship: &Championship) -> GridboardResult<()> {
        let mut tx = self.pool.begin().await?;

        // Keeps the creator from disappearing before the created-set append
        if !Self::lock_account(&mut tx, &championship.creator_id, "FOR SHARE").await? {
            return Err(GridboardError::CreatorNotFound);
        }

        sqlx::query(
            r#"
            INSERT INTO championships (
                championship_id,
                creator_id,
                name,
                organizer,
                contact_phone,
                contact_email,
                state,
                city,
                venue,
                description,
                cover_image,
                logo_image,
                rules_url,
                registration_fee_cents,
                headline_date,
                headline_date_derived,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(championship.championship_id.as_uuid())
        .bind(championship.creator_id.as_uuid())
        .bind(&championship.name)
        .bind(&championship.organizer)
        .bind(&championship.contact_phone)
        .bind(&championship.contact_email)
        .bind(&championship.state)
        .bind(&championship.city)
        .bind(&championship.venue)
        .bind(&championship.description)
        .bind(&championship.cover_image)
        .bind(&championship.logo_image)
        .bind(&championship.rules_url)
        .bind(championship.registration_fee.cents())
        .bind(championship.date)
        .bind(championship.date_derived)
        .bind(championship.created_at)
        .bind(championship.updated_at)
        .execute(&mut *tx)
        .await?;

        Self::insert_stages(&mut tx, &championship.championship_id, &championship.stages).await?;
        Self::insert_categories(
            &mut tx,
            &championship.championship_id,
            &championship.categories,
        )
        .await?;

        sqlx::query(
            r#"
            INSERT INTO account_created_championships (account_id, championship_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(championship.creator_id.as_uuid())
        .bind(championship.championship_id.as_uuid())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn find_championship(
        &self,
        championship_id: &ChampionshipId,
    ) -> GridboardResult<Option<Championship>> {
        let mut conn = self.pool.acquire().await?;

        let sql = format!("{} WHERE championship_id = $1", CHAMPIONSHIP_SELECT);
        let row = sqlx::query_as::<_, ChampionshipRow>(&sql)
            .bind(championship_id.as_uuid())
            .fetch_optional(&mut *conn)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Self::fetch_championships(&mut conn, vec![row])
            .await?
            .pop())
    }

    async fn list_championships(
        &self,
        filter: &ChampionshipFilter,
    ) -> GridboardResult<Vec<Championship>> {
        let mut conn = self.pool.acquire().await?;

        let sql = format!(
            r#"{}
            WHERE ($1::uuid IS NULL OR creator_id = $1)
              AND ($2::text IS NULL OR state = $2)
              AND ($3::text IS NULL OR city = $3)
            ORDER BY created_at, championship_id
            "#,
            CHAMPIONSHIP_SELECT
        );
        let rows = sqlx::query_as::<_, ChampionshipRow>(&sql)
            .bind(filter.creator_id.map(|id| id.into_uuid()))
            .bind(&filter.state)
            .bind(&filter.city)
            .fetch_all(&mut *conn)
            .await?;

        Self::fetch_championships(&mut conn, rows).await
    }

    async fn update_championship(
        &self,
        championship_id: &ChampionshipId,
        acting_account_id: &AccountId,
        patch: &ChampionshipPatch,
    ) -> GridboardResult<Championship> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "{} WHERE championship_id = $1 FOR UPDATE",
            CHAMPIONSHIP_SELECT
        );
        let row = sqlx::query_as::<_, ChampionshipRow>(&sql)
            .bind(championship_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(GridboardError::ChampionshipNotFound)?;

        let current = Self::fetch_championships(&mut tx, vec![row])
            .await?
            .pop()
            .ok_or(GridboardError::ChampionshipNotFound)?;

        // Returning early drops `tx`, which rolls back
        authorize_mutation(&current, acting_account_id)?;
        let next = current.apply_patch(patch)?;

        sqlx::query(
            r#"
            UPDATE championships SET
                name = $2,
                organizer = $3,
                contact_phone = $4,
                contact_email = $5,
                state = $6,
                city = $7,
                venue = $8,
                description = $9,
                cover_image = $10,
                logo_image = $11,
                rules_url = $12,
                registration_fee_cents = $13,
                headline_date = $14,
                headline_date_derived = $15,
                updated_at = $16
            WHERE championship_id = $1
            "#,
        )
        .bind(championship_id.as_uuid())
        .bind(&next.name)
        .bind(&next.organizer)
        .bind(&next.contact_phone)
        .bind(&next.contact_email)
        .bind(&next.state)
        .bind(&next.city)
        .bind(&next.venue)
        .bind(&next.description)
        .bind(&next.cover_image)
        .bind(&next.logo_image)
        .bind(&next.rules_url)
        .bind(next.registration_fee.cents())
        .bind(next.date)
        .bind(next.date_derived)
        .bind(next.updated_at)
        .execute(&mut *tx)
        .await?;

        if patch.stages.is_some() {
            sqlx::query("DELETE FROM championship_stages WHERE championship_id = $1")
                .bind(championship_id.as_uuid())
                .execute(&mut *tx)
                .await?;
            Self::insert_stages(&mut tx, championship_id, &next.stages).await?;
        }

        if patch.categories.is_some() {
            sqlx::query("DELETE FROM championship_categories WHERE championship_id = $1")
                .bind(championship_id.as_uuid())
                .execute(&mut *tx)
                .await?;
            Self::insert_categories(&mut tx, championship_id, &next.categories).await?;
        }

        tx.commit().await?;

        Ok(next)
    }
}

/// A unique violation on `accounts` can only be the identity constraint
fn identity_conflict(e: sqlx::Error) -> GridboardError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            GridboardError::DuplicateIdentity
        }
        _ => GridboardError::Database(e),
    }
}

fn db_position(position: u32) -> GridboardResult<i32> {
    i32::try_from(position).map_err(|_| GridboardError::validation("Too many entries"))
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    identity: String,
    display_name: String,
    password_hash: String,
    avatar: Option<String>,
    reset_token_hash: Option<String>,
    reset_token_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    created_championships: Vec<Uuid>,
    registered_championships: Vec<Uuid>,
}

impl AccountRow {
    fn into_account(self) -> GridboardResult<Account> {
        let password = AccountPassword::from_phc_string(self.password_hash)?;

        let reset_ticket = match (self.reset_token_hash, self.reset_token_expires_at) {
            (Some(token_hash), Some(expires_at)) => Some(ResetTicket {
                token_hash,
                expires_at,
            }),
            _ => None,
        };

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            identity: Email::from_db(self.identity),
            display_name: DisplayName::from_db(self.display_name),
            password,
            avatar: self.avatar,
            created_championships: self
                .created_championships
                .into_iter()
                .map(ChampionshipId::from_uuid)
                .collect(),
            registered_championships: self
                .registered_championships
                .into_iter()
                .map(ChampionshipId::from_uuid)
                .collect(),
            reset_ticket,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ChampionshipRow {
    championship_id: Uuid,
    creator_id: Uuid,
    name: String,
    organizer: Option<String>,
    contact_phone: Option<String>,
    contact_email: Option<String>,
    state: Option<String>,
    city: Option<String>,
    venue: Option<String>,
    description: Option<String>,
    cover_image: Option<String>,
    logo_image: Option<String>,
    rules_url: Option<String>,
    registration_fee_cents: i64,
    headline_date: Option<NaiveDate>,
    headline_date_derived: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ChampionshipRow {
    fn into_championship(self, stages: Vec<Stage>, categories: Vec<Category>) -> Championship {
        Championship {
            championship_id: ChampionshipId::from_uuid(self.championship_id),
            creator_id: AccountId::from_uuid(self.creator_id),
            name: self.name,
            organizer: self.organizer,
            contact_phone: self.contact_phone,
            contact_email: self.contact_email,
            state: self.state,
            city: self.city,
            venue: self.venue,
            description: self.description,
            cover_image: self.cover_image,
            logo_image: self.logo_image,
            rules_url: self.rules_url,
            registration_fee: Amount::from_db(self.registration_fee_cents),
            date: self.headline_date,
            date_derived: self.headline_date_derived,
            stages,
            categories,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StageRow {
    championship_id: Uuid,
    position: i32,
    name: String,
    stage_date: NaiveDate,
    location: String,
    track_layout: Option<String>,
    price_cents: i64,
    image: Option<String>,
}

impl StageRow {
    fn into_stage(self) -> GridboardResult<Stage> {
        Ok(Stage {
            position: row_position(self.position)?,
            name: self.name,
            date: self.stage_date,
            location: self.location,
            track_layout: self.track_layout,
            price: Amount::from_db(self.price_cents),
            image: self.image,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    championship_id: Uuid,
    position: i32,
    name: String,
    capacity: i32,
}

impl CategoryRow {
    fn into_category(self) -> GridboardResult<Category> {
        Ok(Category {
            position: row_position(self.position)?,
            name: self.name,
            capacity: u32::try_from(self.capacity)
                .map_err(|_| GridboardError::Internal("Invalid category capacity".to_string()))?,
        })
    }
}

fn row_position(position: i32) -> GridboardResult<u32> {
    u32::try_from(position)
        .map_err(|_| GridboardError::Internal(format!("Invalid position: {}", position)))
}
