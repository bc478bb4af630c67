use anyhow::Result;

#[actix_web::main]
async fn main() -> Result<()> {
    transport_helper_server::run().await?;
    Ok(())
}
