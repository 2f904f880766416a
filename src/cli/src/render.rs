//! Text and JSON rendering of an explained transaction.

use std::fmt::{self, Write};

use serde::Serialize;
use url::Url;

use suilens::activity::{ActivityCard, ActivityFeed};
use suilens::classifier::{ObjectSummary, TxSummary};
use suilens::commands::CommandStep;
use suilens::utils::{format_address, format_amount};
use suilens::{Explanation, NarrativeView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    narrative: &'a NarrativeView,
    #[serde(flatten)]
    explanation: &'a Explanation,
    #[serde(skip_serializing_if = "Option::is_none")]
    share_link: Option<&'a str>,
}

pub fn render(
    format: OutputFormat,
    explanation: &Explanation,
    narrative: &NarrativeView,
    show_all: bool,
    share_link: Option<&Url>,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&JsonDocument {
            narrative,
            explanation,
            share_link: share_link.map(Url::as_str),
        })?),
        OutputFormat::Text => Ok(render_text(explanation, narrative, show_all, share_link)?),
    }
}

pub fn render_text(
    explanation: &Explanation,
    narrative: &NarrativeView,
    show_all: bool,
    share_link: Option<&Url>,
) -> Result<String, fmt::Error> {
    let summary = &explanation.summary;
    let mut out = String::new();

    writeln!(out, "Transaction {}", format_address(Some(&summary.digest)))?;
    writeln!(out, "Status: {}", summary.status)?;
    write_narrative(&mut out, narrative)?;
    write_failure(&mut out, summary)?;
    write_overview(&mut out, summary)?;
    write_balances(&mut out, summary)?;
    write_objects(&mut out, &summary.objects)?;
    write_steps(&mut out, &explanation.steps)?;
    write_activity(&mut out, &explanation.activity, show_all)?;

    if let Some(link) = share_link {
        writeln!(out)?;
        writeln!(out, "Share: {link}")?;
    }

    Ok(out)
}

fn write_narrative(out: &mut String, narrative: &NarrativeView) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "{}", narrative.text)?;
    match (&narrative.model_label, narrative.confidence) {
        (Some(model), Some(confidence)) => writeln!(out, "  ({model}, {confidence})"),
        (Some(model), None) => writeln!(out, "  ({model})"),
        _ => Ok(()),
    }
}

fn write_failure(out: &mut String, summary: &TxSummary) -> fmt::Result {
    let Some(failure) = &summary.failure else {
        return Ok(());
    };
    writeln!(out)?;
    writeln!(out, "Execution failed: {}", failure.cause_label)?;
    writeln!(out, "  {}", failure.raw_error)
}

fn write_overview(out: &mut String, summary: &TxSummary) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "Action: {}", summary.primary_label())?;
    writeln!(
        out,
        "Gas: {} SUI (computation {}, storage {}, rebate {})",
        summary.gas.display,
        summary.gas.computation_cost,
        summary.gas.storage_cost,
        summary.gas.storage_rebate
    )?;

    let destination = if summary.flow.receivers.is_empty() {
        summary.flow.destination_label().to_string()
    } else {
        summary.flow.receivers.join(", ")
    };
    writeln!(out, "Flow: {} -> {destination}", summary.flow.sender)
}

fn write_balances(out: &mut String, summary: &TxSummary) -> fmt::Result {
    if summary.balances.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "Balance changes:")?;
    for row in &summary.balances {
        writeln!(out, "  {:<14} {} {}", row.owner, row.display_amount, row.symbol)?;
    }
    Ok(())
}

fn write_objects(out: &mut String, objects: &ObjectSummary) -> fmt::Result {
    if objects.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "Objects:")?;

    if !objects.created.is_empty() {
        writeln!(out, "  Created ({}):", objects.created.len())?;
        for row in &objects.created {
            writeln!(out, "    + {}", row.display)?;
        }
    }

    let (preview, remaining) = objects.mutated_preview();
    if !preview.is_empty() {
        writeln!(out, "  Mutated ({}):", objects.mutated.len())?;
        for row in preview {
            writeln!(out, "    ~ {}", row.display)?;
        }
        if remaining > 0 {
            writeln!(out, "    ...and {remaining} more")?;
        }
    }

    if !objects.published.is_empty() {
        writeln!(out, "  Published: {} package(s)", objects.published.len())?;
    }

    if let Some(footnote) = objects.hidden_footnote() {
        writeln!(out, "  {footnote}")?;
    }
    Ok(())
}

fn write_steps(out: &mut String, steps: &[CommandStep]) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "Command flow:")?;
    for step in steps {
        match &step.detail {
            Some(detail) => writeln!(out, "  {}. {} {} ({detail})", step.index + 1, step.icon, step.label)?,
            None => writeln!(out, "  {}. {} {}", step.index + 1, step.icon, step.label)?,
        }
    }
    Ok(())
}

fn write_activity(out: &mut String, feed: &ActivityFeed, show_all: bool) -> fmt::Result {
    if feed.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "Activity:")?;
    for card in feed.visible(show_all) {
        writeln!(out, "  {}", card_line(card))?;
    }
    if !show_all {
        if let Some(label) = feed.expand_label() {
            writeln!(out, "  + {} more activities... {label} with --all", feed.hidden_count())?;
        }
    }
    Ok(())
}

fn card_line(card: &ActivityCard) -> String {
    match card {
        ActivityCard::Swap(swap) => format!(
            "{}: {} {} -> {} {}",
            swap.title(),
            format_amount(&swap.amount_in),
            swap.coin_in,
            format_amount(&swap.amount_out),
            swap.coin_out
        ),
        ActivityCard::Deposit(deposit) => {
            format!("{}: {}", deposit.title(), format_amount(&deposit.amount))
        }
        ActivityCard::Stake(stake) => format!("{}: {}", stake.title(), format_amount(&stake.amount)),
        ActivityCard::Generic(generic) => format!("{} ({})", generic.name, generic.source()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use suilens::ProtocolRegistry;
    use suilens::test_utils::{CETUS_PACKAGE, RECEIVER_A, RecordBuilder, SENDER};

    fn explain(builder: RecordBuilder) -> (Explanation, NarrativeView) {
        let explanation = Explanation::build(&builder.build(), &ProtocolRegistry::with_known_protocols());
        let narrative = NarrativeView::heuristic(&explanation.summary);
        (explanation, narrative)
    }

    #[test]
    fn test_text_for_swap() {
        let (explanation, narrative) = explain(
            RecordBuilder::new()
                .split_coins()
                .move_call(CETUS_PACKAGE, "pool_script", "swap_b2a")
                .balance(SENDER, -2_000_000_000, "0x2::sui::SUI")
                .mutated("0x1", "0x2::dynamic_field::Field<u64, u64>")
                .event(
                    CETUS_PACKAGE,
                    "0x1eab::pool::SwapEvent<0x2::sui::SUI, 0xdba3::usdc::USDC>",
                    &[("amount_in", "2000000000"), ("amount_out", "7184213")],
                ),
        );
        let text = render_text(&explanation, &narrative, false, None).unwrap();

        assert!(text.contains("Status: success"));
        assert!(text.contains("Sender interacted with Cetus CLMM (pool_script::swap_b2a)."));
        assert!(text.contains("  1. ✂️ SplitCoins\n"));
        assert!(text.contains("  2. 🐳 Cetus CLMM (swap_b2a)\n"));
        assert!(text.contains("Swap on Cetus CLMM: 2.00 SUI -> 0.007184 USDC"));
        assert!(text.contains("+1 hidden low-level object (dynamic field)"));
        assert!(text.contains("Flow:"));
        assert!(!text.contains("Execution failed"));
    }

    #[test]
    fn test_failure_shows_raw_error() {
        let raw = "MoveAbort(MoveLocation { module: ModuleId { address: 0x2, name: Identifier(\"coin\") }, function: 1, instruction: 4, function_name: Some(\"split\") }, 0) in command 0";
        let (explanation, narrative) = explain(RecordBuilder::new().split_coins().failed(raw));
        let text = render_text(&explanation, &narrative, false, None).unwrap();

        assert!(text.contains("Status: failure"));
        assert!(text.contains("Execution failed: contract rejected input"));
        assert!(text.contains(raw));
    }

    #[test]
    fn test_collapsed_activity_mentions_the_rest() {
        let mut builder = RecordBuilder::new().balance(RECEIVER_A, 1, "0x2::sui::SUI");
        for i in 0..7 {
            builder = builder.event(CETUS_PACKAGE, &format!("0x1eab::pool::Tick{i}"), &[]);
        }
        let (explanation, narrative) = explain(builder);

        let collapsed = render_text(&explanation, &narrative, false, None).unwrap();
        assert!(collapsed.contains("+ 2 more activities... Show All (7) with --all"));
        assert!(!collapsed.contains("Tick6"));

        let expanded = render_text(&explanation, &narrative, true, None).unwrap();
        assert!(expanded.contains("Tick6 (Cetus CLMM)"));
    }

    #[test]
    fn test_json_document_carries_share_link() {
        let (explanation, narrative) = explain(RecordBuilder::new().transfer_objects());
        let link = Url::parse("https://suilens.app/?tx=abc").unwrap();
        let rendered = render(OutputFormat::Json, &explanation, &narrative, false, Some(&link)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["share_link"], "https://suilens.app/?tx=abc");
        assert_eq!(value["narrative"]["mode"], "heuristic");
        assert_eq!(value["steps"][0]["label"], "TransferObjects");
        assert_eq!(value["summary"]["status"]["status"], "success");
    }
}
