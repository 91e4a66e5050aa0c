use hotel_booking_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    services::inventory_linker,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let report = inventory_linker::reconcile(&orm).await?;
    println!(
        "Checked {} hotels, repaired {}",
        report.hotels_checked, report.hotels_repaired
    );
    for id in &report.orphaned_room_types {
        println!("Orphaned room type: {id}");
    }
    Ok(())
}
