use super::{hash, server, Action};
use anyhow::Result;

pub(super) async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Server(args) => server::execute(args).await,
        Action::Hash(args) => {
            hash::execute(&args);
            Ok(())
        }
    }
}
