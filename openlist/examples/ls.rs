use std::env;

use openlist::{files::ListReq, OpenList};

fn var(key: &str) -> String {
    dotenv::var(key).unwrap_or_else(|_| panic!("`{key}` is not defined"))
}

#[tokio::main]
async fn main() -> Result<(), openlist::Error> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let path = env::args().nth(1).unwrap_or_else(|| "/".into());

    let openlist = OpenList::new(var("OPENLIST_URL"))?;

    let login = openlist
        .auth()
        .login_hash(&var("OPENLIST_USERNAME"), &var("OPENLIST_PASSWORD"), None)
        .await?;
    openlist.set_token(login.data.token);

    let listing = openlist.fs().list(&ListReq::new(&path)).await?.data;

    for item in listing.content {
        let kind = if item.is_dir { "dir" } else { "file" };
        println!("{:>4} {:>12} {}", kind, item.size, item.name);
    }

    println!("{} items in {path}", listing.total);

    Ok(())
}
