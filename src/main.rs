#[tokio::main]
async fn main() -> anyhow::Result<()> {
    employee_invites::bootstrapper::run().await
}
