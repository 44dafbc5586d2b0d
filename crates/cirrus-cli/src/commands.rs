//! Command handlers for the cirrus binary.
//!
//! Each handler drives exactly one user action against the provider and
//! prints the outcome. Handlers take the provider as a trait object so
//! they can run against the in-memory mock in tests.

use anyhow::Context;
use cirrus_cloud::naming::generate_name;
use cirrus_cloud::{ops, ComputeProvider, InstanceSummary, KeyPairMaterial};
use colored::Colorize;
use comfy_table::Table;
use dialoguer::{theme::ColorfulTheme, Select};
use std::path::{Path, PathBuf};

/// Launch one instance. A missing key pair or group is created on the
/// fly with an auto-generated name, exactly like filling the launch form
/// with blanks.
pub async fn launch(
    provider: &dyn ComputeProvider,
    key_name: Option<String>,
    group_id: Option<String>,
    name: Option<String>,
) -> anyhow::Result<()> {
    let key_name = match key_name {
        Some(k) => k,
        None => {
            let key = ops::create_key_pair(provider, &generate_name("auto-key")).await?;
            let path = save_pem(Path::new("."), &key)?;
            println!(
                "{} key pair {} created, PEM saved to {}",
                "✓".green(),
                key.name.cyan(),
                path.display()
            );
            key.name
        }
    };

    let group_id = match group_id {
        Some(g) => g,
        None => {
            let id = ops::create_access_group(provider, &generate_name("auto-sg")).await?;
            println!("{} security group {} created", "✓".green(), id.cyan());
            id
        }
    };

    let instance_id =
        ops::launch_instance(provider, &key_name, &group_id, name.as_deref().unwrap_or("")).await?;
    println!("{} instance launched: {}", "✓".green(), instance_id.cyan());
    Ok(())
}

/// Create a key pair and persist the one-time secret as `<name>.pem`.
pub async fn create_key(provider: &dyn ComputeProvider, name: &str) -> anyhow::Result<()> {
    let key = ops::create_key_pair(provider, name).await?;
    let path = save_pem(Path::new("."), &key)?;
    println!("{} key pair {} created", "✓".green(), key.name.cyan());
    println!(
        "  PEM saved to {} - this is the only copy of the secret",
        path.display()
    );
    Ok(())
}

/// Create a security group with SSH open from anywhere.
pub async fn create_group(provider: &dyn ComputeProvider, name: &str) -> anyhow::Result<()> {
    let group_id = ops::create_access_group(provider, name).await?;
    println!("{} security group created: {}", "✓".green(), group_id.cyan());
    Ok(())
}

/// List every instance in the region, as a table or as JSON.
pub async fn ls(provider: &dyn ComputeProvider, json: bool) -> anyhow::Result<()> {
    let summaries = ops::list_instances(provider).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!("No instances found in {}.", provider.region());
        return Ok(());
    }

    println!("{}", render_table(&summaries));
    Ok(())
}

pub async fn start(provider: &dyn ComputeProvider, id: &str) -> anyhow::Result<()> {
    ops::start_instance(provider, id).await?;
    println!("{} start requested for {}", "✓".green(), id.cyan());
    Ok(())
}

pub async fn stop(provider: &dyn ComputeProvider, id: &str) -> anyhow::Result<()> {
    ops::stop_instance(provider, id).await?;
    println!("{} stop requested for {}", "✓".yellow(), id.cyan());
    Ok(())
}

pub async fn terminate(provider: &dyn ComputeProvider, id: &str) -> anyhow::Result<()> {
    ops::terminate_instance(provider, id).await?;
    println!("{} terminate requested for {}", "✓".red(), id.cyan());
    Ok(())
}

/// Interactive management panel: pick an instance, pick an action,
/// repeat. One failed action is reported and the panel stays open.
pub async fn manage(provider: &dyn ComputeProvider) -> anyhow::Result<()> {
    loop {
        let summaries = ops::list_instances(provider).await?;
        if summaries.is_empty() {
            println!("No instances available to manage.");
            return Ok(());
        }

        let mut items: Vec<String> = summaries
            .iter()
            .map(|s| {
                format!(
                    "{}  {}  {}  {}",
                    s.id, s.instance_type, s.state, s.name
                )
            })
            .collect();
        items.push("Quit".to_string());

        let picked = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Select an instance")
            .items(&items)
            .default(0)
            .interact()?;
        if picked == items.len() - 1 {
            return Ok(());
        }
        let id = summaries[picked].id.clone();

        let actions = ["Start", "Stop", "Terminate", "Back"];
        let action = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Action for {id}"))
            .items(&actions)
            .default(0)
            .interact()?;

        let result = match action {
            0 => start(provider, &id).await,
            1 => stop(provider, &id).await,
            2 => terminate(provider, &id).await,
            _ => Ok(()),
        };

        if let Err(e) = result {
            eprintln!("{} {:#}", "✗".red(), e);
        }
    }
}

/// Write the one-time secret to `<dir>/<name>.pem`, owner-readable only.
fn save_pem(dir: &Path, key: &KeyPairMaterial) -> anyhow::Result<PathBuf> {
    let path = dir.join(format!("{}.pem", key.name));
    std::fs::write(&path, &key.material)
        .with_context(|| format!("failed to write {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
            .with_context(|| format!("failed to restrict permissions on {}", path.display()))?;
    }

    Ok(path)
}

fn render_table(summaries: &[InstanceSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Type", "State", "Public IP", "Name"]);
    for s in summaries {
        table.add_row(vec![
            &s.id,
            &s.instance_type,
            &s.state,
            &s.public_ip,
            &s.name,
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirrus_cloud::mock::{Call, MockCompute};
    use cirrus_cloud::InstanceRecord;

    #[test]
    fn pem_file_is_owner_readable_only() {
        let dir = tempfile::tempdir().unwrap();
        let key = KeyPairMaterial {
            name: "k1".to_string(),
            material: "secret".to_string(),
        };

        let path = save_pem(dir.path(), &key).unwrap();
        assert_eq!(path.file_name().unwrap(), "k1.pem");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "secret");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[tokio::test]
    async fn launch_with_supplied_resources_only_runs_instance() {
        let mock = MockCompute::default();

        launch(
            &mock,
            Some("k1".to_string()),
            Some("sg-123".to_string()),
            Some("web".to_string()),
        )
        .await
        .unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            &calls[0],
            Call::RunInstance { key_name, security_group_id, name_tag }
                if key_name == "k1" && security_group_id == "sg-123" && name_tag == "web"
        ));
    }

    #[tokio::test]
    async fn launch_auto_creates_missing_group() {
        let mock = MockCompute::default();

        launch(&mock, Some("k1".to_string()), None, None)
            .await
            .unwrap();

        let calls = mock.calls();
        assert!(matches!(
            &calls[0],
            Call::CreateSecurityGroup { name, .. } if name.starts_with("auto-sg-")
        ));
        assert!(matches!(calls[1], Call::AuthorizeIngress { .. }));
        assert!(matches!(
            &calls[2],
            Call::RunInstance { name_tag, .. } if name_tag.starts_with("EC2-")
        ));
    }

    #[test]
    fn table_renders_every_column() {
        let summaries = vec![InstanceSummary::from(InstanceRecord {
            id: "i-0abc".to_string(),
            instance_type: "t2.micro".to_string(),
            state: "running".to_string(),
            public_ip: Some("3.7.45.1".to_string()),
            name: Some("web".to_string()),
        })];

        let rendered = render_table(&summaries).to_string();
        for cell in ["i-0abc", "t2.micro", "running", "3.7.45.1", "web"] {
            assert!(rendered.contains(cell), "missing {cell} in table");
        }
    }
}
