//! Plan display

use crate::engine::planner::DeployPlan;
use colored::Colorize;
use declarative::{Action, ResourceState};

/// Print a plan in a user-friendly format
pub fn display_plan(plan: &DeployPlan) {
    let desired = &plan.desired;

    if !plan.has_changes() {
        println!();
        println!("  {} No changes needed for {}", "✓".green(), desired.name);
        return;
    }

    println!();
    println!(
        "┌─ {} ─────────────────────────────────────────┐",
        "Deploy Plan".bold()
    );
    println!("│");

    let symbol = match plan.action {
        Action::Create => "+".green(),
        Action::Update => "~".yellow(),
    };
    let state_desc = match &plan.current {
        ResourceState::Absent => "(not deployed)".to_string(),
        ResourceState::Present { details } => details
            .as_ref()
            .map(|d| format!("({d})"))
            .unwrap_or_default(),
    };

    println!(
        "│   {} {} {} {}",
        symbol,
        desired.name.bold(),
        format!("[{}, {}, {}]", desired.document_type, desired.format, desired.region).dimmed(),
        state_desc.dimmed()
    );

    if let Some(diff) = plan.content_diff() {
        println!("│");
        println!("│ {}", "Content".bold());
        for line in diff.lines() {
            let styled = if line.starts_with("+++") || line.starts_with("---") {
                line.bold().to_string()
            } else if line.starts_with('+') {
                line.green().to_string()
            } else if line.starts_with('-') {
                line.red().to_string()
            } else if line.starts_with("@@") {
                line.cyan().to_string()
            } else {
                line.dimmed().to_string()
            };
            println!("│   {styled}");
        }
    }

    if !plan.permissions.is_empty() {
        println!("│");
        println!("│ {}", "Share permissions".bold());
        for account in &plan.permissions.to_add {
            println!("│   {} {}", "+".green(), account);
        }
        for account in &plan.permissions.to_remove {
            println!("│   {} {}", "-".red(), account);
        }
    }

    if desired.set_default_version && plan.action == Action::Update && plan.content_changed() {
        println!("│");
        println!("│   {}", "new version becomes the default version".dimmed());
    }

    println!("│");
    println!("└──────────────────────────────────────────────────────┘");
    println!();
    println!("  {}", summary(plan).dimmed());
}

/// One-line summary of a plan
pub fn summary(plan: &DeployPlan) -> String {
    let mut parts = Vec::new();
    if plan.content_changed() {
        parts.push(format!("{} document", plan.action.verb()));
    }
    if !plan.permissions.is_empty() {
        parts.push(format!(
            "{} permission change{}",
            plan.permissions.total(),
            if plan.permissions.total() == 1 { "" } else { "s" }
        ));
    }
    if parts.is_empty() {
        "no changes".to_string()
    } else {
        format!("Plan: {}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::desired::DesiredDocument;
    use declarative::SetDiff;
    use ssmkit::{DocumentFormat, DocumentType};

    fn plan(action: Action, accounts: &[&str]) -> DeployPlan {
        let account_ids: Vec<String> = accounts.iter().map(|s| s.to_string()).collect();
        DeployPlan {
            desired: DesiredDocument {
                name: "doc".to_string(),
                region: "us-east-1".to_string(),
                document_type: DocumentType::Command,
                format: DocumentFormat::Json,
                content: "{}".to_string(),
                account_ids: account_ids.clone(),
                set_default_version: false,
            },
            action,
            current: ResourceState::Absent,
            live: None,
            permissions: SetDiff::compute(&account_ids, &Vec::<String>::new()),
        }
    }

    #[test]
    fn test_summary() {
        assert_eq!(
            summary(&plan(Action::Create, &["111111111111"])),
            "Plan: create document, 1 permission change"
        );
        assert_eq!(
            summary(&plan(Action::Create, &["111111111111", "all"])),
            "Plan: create document, 2 permission changes"
        );
    }
}
