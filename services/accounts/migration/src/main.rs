use sea_orm_migration::prelude::*;

mod m20260401_000001_create_accounts;
mod m20260401_000002_create_activation_tokens;
mod m20260401_000003_create_verification_tokens;
mod m20260401_000004_create_phone_whitelist;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260401_000001_create_accounts::Migration),
            Box::new(m20260401_000002_create_activation_tokens::Migration),
            Box::new(m20260401_000003_create_verification_tokens::Migration),
            Box::new(m20260401_000004_create_phone_whitelist::Migration),
        ]
    }
}

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
