//! Text rendering of the view model.

use crate::view::model::ViewModel;

/// Render the page as plain text.
pub fn render(model: &ViewModel) -> String {
    let mut out = String::new();

    let Some(record) = model.record() else {
        out.push_str("Loading...\n");
        if let Some(banner) = model.banner() {
            out.push_str(&format!("Error: {}\n", banner.message));
        }
        return out;
    };

    out.push_str("Staking App\n");
    if let Some(session) = model.session() {
        out.push_str(&format!("Account: {} (chain {})\n", session.address, session.chain_id));
    }

    out.push_str("\nYour Staking Data:\n");
    out.push_str(&format!("  Total Staked: {}\n", record.total_staked_display()));
    out.push_str(&format!("  Reward: {}\n", record.reward_display()));

    out.push('\n');
    if !model.amount().is_empty() {
        out.push_str(&format!("Amount: {}\n", model.amount()));
    }
    match model.busy() {
        Some(kind) => out.push_str(&format!("Actions: disabled ({} in progress)\n", kind)),
        None if model.actions_enabled() => out.push_str("Actions: stake | unstake | claim\n"),
        None => out.push_str("Actions: disabled\n"),
    }

    if let Some(tx) = model.last_tx() {
        out.push_str(&format!("Last transaction: {}\n", tx.tx_hash));
    }
    if let Some(banner) = model.banner() {
        out.push_str(&format!("Error: {}\n", banner.message));
    }

    out
}
