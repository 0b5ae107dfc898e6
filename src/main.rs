#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    case_label_server::run().await
}
