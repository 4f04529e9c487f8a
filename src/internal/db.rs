//! Database access for the dashboard: connection setup, schema bootstrap, ban lookups and custom
//! command persistence.

use std::collections::BTreeSet;

use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Schema, TransactionTrait,
};

use crate::internal::{
    custom_command::CustomCommand,
    model::{custom_command, daily, profile},
};

/// Connects to `url`. In-memory SQLite is pinned to a single connection so every query sees the
/// same database.
pub async fn establish_connection(url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(url);
    options.sqlx_logging(false);
    if url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }
    Database::connect(options).await
}

/// Creates the dashboard tables if they are missing.
pub async fn setup_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let statements = [
        schema.create_table_from_entity(daily::Entity),
        schema.create_table_from_entity(profile::Entity),
        schema.create_table_from_entity(custom_command::Entity),
    ];
    for mut statement in statements {
        statement.if_not_exists();
        db.execute(backend.build(&statement)).await?;
    }
    Ok(())
}

/// Banned profiles among the accounts that claimed dailies from `ip`.
pub async fn banned_profiles_for_ip(
    db: &DatabaseConnection,
    ip: &str,
) -> Result<Vec<profile::Model>, DbErr> {
    let user_ids: BTreeSet<i64> = daily::Entity::find()
        .filter(daily::Column::Ip.eq(ip))
        .all(db)
        .await?
        .into_iter()
        .map(|daily| daily.user_id)
        .collect();

    if user_ids.is_empty() {
        return Ok(Vec::new());
    }

    profile::Entity::find()
        .filter(profile::Column::Id.is_in(user_ids))
        .filter(profile::Column::IsBanned.eq(true))
        .all(db)
        .await
}

pub async fn custom_commands_for_guild(
    db: &DatabaseConnection,
    guild_id: u64,
) -> Result<Vec<CustomCommand>, DbErr> {
    Ok(custom_command::Entity::find()
        .filter(custom_command::Column::GuildId.eq(guild_id as i64))
        .order_by_asc(custom_command::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(CustomCommand::from)
        .collect())
}

/// Replaces the whole command list of `guild_id` in one transaction.
pub async fn replace_custom_commands(
    db: &DatabaseConnection,
    guild_id: u64,
    commands: &[CustomCommand],
) -> Result<(), DbErr> {
    let txn = db.begin().await?;

    custom_command::Entity::delete_many()
        .filter(custom_command::Column::GuildId.eq(guild_id as i64))
        .exec(&txn)
        .await?;

    if !commands.is_empty() {
        let rows = commands.iter().map(|command| custom_command::ActiveModel {
            id: NotSet,
            guild_id: Set(guild_id as i64),
            label: Set(command.label.clone()),
            code: Set(command.code.clone()),
        });
        custom_command::Entity::insert_many(rows).exec(&txn).await?;
    }

    txn.commit().await
}
