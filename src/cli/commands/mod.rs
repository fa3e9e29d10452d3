use anyhow::Result;

pub mod setup;

pub use setup::SetupCommand;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}
