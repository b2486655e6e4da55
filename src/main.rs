use mxxn::env::{Environment, framework_root};
use mxxn::runtime::fail;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env = match framework_root().and_then(|root| Environment::builder(root).build()) {
        Ok(env) => env,
        Err(e) => fail(e.message()),
    };
    mxxn::runtime::run(env).await
}
