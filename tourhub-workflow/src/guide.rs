use crate::workflow::WorkflowName;
use chrono::{DateTime, Utc};
use tourhub_core::tour::TourAggregate;

/// Render the instruction guide for a tour.
///
/// Deterministic template: the same aggregate, workflow list, and timestamp
/// always produce byte-identical text. Workflow sections appear in the
/// canonical execution order, matching the order their sample orders were
/// created in.
pub fn render(
    aggregate: &TourAggregate,
    workflows: &[WorkflowName],
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();

    push_heading(&mut out, "WAREHOUSE TOUR INSTRUCTION GUIDE");

    push_section(&mut out, "Tour Overview");
    out.push_str(&format!(
        "Date: {}\n",
        aggregate.tour.scheduled_for.format("%Y-%m-%d")
    ));
    out.push_str(&format!(
        "Time: {} UTC\n",
        aggregate.tour.scheduled_for.format("%H:%M")
    ));
    out.push_str(&format!(
        "Warehouse: {} ({})\n",
        aggregate.warehouse.name, aggregate.warehouse.address
    ));
    out.push_str(&format!("Host: {}\n", aggregate.host.display_name));
    out.push_str(&format!("Participants: {}\n", aggregate.participants.len()));

    push_section(&mut out, "Welcome (5 minutes)");
    out.push_str("- Greet participants and hand out visitor badges\n");
    out.push_str("- Walk through the safety briefing: marked walkways, no touching live conveyors\n");
    out.push_str("- Introduce the agenda and the demonstration stations\n");

    push_section(&mut out, "Warehouse Overview (10 minutes)");
    out.push_str("- Walk the receiving dock, storage aisles, and packing stations\n");
    out.push_str("- Explain how inventory flows from dock door to outbound trailer\n");
    out.push_str("- Point out the light-directed stations used in the demonstrations\n");

    for workflow in workflows {
        push_section(
            &mut out,
            &format!("Demonstration: {} ({} minutes)", workflow.label(), estimate_minutes(*workflow)),
        );
        for point in talking_points(*workflow) {
            out.push_str("- ");
            out.push_str(point);
            out.push('\n');
        }
        out.push_str(
            "- Note: this station is pre-loaded with system-generated sample orders for the demonstration\n",
        );
    }

    push_section(&mut out, "Dashboard Demo (10 minutes)");
    out.push_str("- Show the order dashboard with the sample orders created for this tour\n");
    out.push_str("- Filter by tour tags to isolate today's demonstration data\n");
    out.push_str("- Walk through one order's line items, totals, and fulfillment status\n");

    push_section(&mut out, "Q&A (10 minutes)");
    out.push_str("- Open the floor; capture unanswered questions for written follow-up\n");

    push_section(&mut out, "Follow-Up Checklist");
    out.push_str("- Send thank-you notes with the recorded demo link\n");
    out.push_str("- Share pricing and onboarding material with interested participants\n");
    out.push_str("- Log attendee questions and route them to the right team\n");
    out.push_str("- Archive this tour's sample orders after 30 days\n");

    push_section(&mut out, "Success Metrics");
    out.push_str("- Every selected workflow demonstrated end to end\n");
    out.push_str("- All participant questions answered or captured\n");
    out.push_str("- At least one follow-up meeting scheduled\n");

    out.push_str("\n---\n");
    out.push_str(&format!(
        "Selected products: {}\n",
        aggregate.tour.selected_product_ids.join(", ")
    ));
    out.push_str(&format!(
        "Generated at {}\n",
        generated_at.format("%Y-%m-%dT%H:%M:%SZ")
    ));

    out
}

fn push_heading(out: &mut String, title: &str) {
    out.push_str("==========================================\n");
    out.push_str(title);
    out.push('\n');
    out.push_str("==========================================\n");
}

fn push_section(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&"-".repeat(title.len()));
    out.push('\n');
}

fn estimate_minutes(workflow: WorkflowName) -> u32 {
    match workflow {
        WorkflowName::ReceiveToLight => 15,
        WorkflowName::PackToLight => 15,
        WorkflowName::StandardReceiving => 10,
        WorkflowName::BulkShipping => 20,
        WorkflowName::SingleItemBatch => 15,
        WorkflowName::MultiItemBatch => 20,
    }
}

fn talking_points(workflow: WorkflowName) -> &'static [&'static str] {
    match workflow {
        WorkflowName::ReceiveToLight => &[
            "Scan an inbound purchase order and watch the put lights direct each item",
            "Highlight how receive-to-light removes paper checklists from receiving",
            "Show the received quantities reconciling against the purchase order",
        ],
        WorkflowName::PackToLight => &[
            "Pick a multi-line order and let the pack lights sequence the cartons",
            "Demonstrate how mis-packs are caught at the station, not at the dock",
            "Show the packed order moving to the shipping queue",
        ],
        WorkflowName::StandardReceiving => &[
            "Receive a purchase order at a standard station with a handheld scanner",
            "Compare the manual flow against the light-directed stations",
            "Show inventory levels updating as each line is received",
        ],
        WorkflowName::BulkShipping => &[
            "Release the bulk wave and show identical orders grouped into one pick",
            "Walk through label printing and sorting for the bulk batch",
            "Contrast per-order picking time against the bulk wave",
        ],
        WorkflowName::SingleItemBatch => &[
            "Release a batch of single-item orders into one picking pass",
            "Show the picker's path through the aisles on the batch cart",
            "Scan items straight into labeled sort slots",
        ],
        WorkflowName::MultiItemBatch => &[
            "Release a batch of multi-line orders and show the cart's sort walls",
            "Demonstrate the put-wall separating items back into orders",
            "Show order completeness checks before the packing handoff",
        ],
    }
}
