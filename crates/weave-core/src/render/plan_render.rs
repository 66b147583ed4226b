use crate::plan::Plan;

/// Render a plan to Markdown
///
/// Generates:
/// - Title as H1 with the order digest
/// - One H2 per extension point, in export order, with a numbered action list
/// - An interrupt table, if any interrupts were declared
/// - A diagnostics list, if any were recorded
///
/// # Arguments
/// * `plan` - Plan to render
///
/// # Returns
/// Markdown string representation
pub fn render_plan_markdown(plan: &Plan) -> String {
    let mut output = String::new();

    output.push_str("# Assembly plan\n\n");
    output.push_str(&format!("**Order digest**: `{}`\n\n", plan.order_digest));

    for service in &plan.extension_points {
        output.push_str(&format!("## {}\n\n", service.name));
        output.push_str(&format!("**Exporter**: {}\n\n", service.exporter));

        if service.actions.is_empty() {
            output.push_str("_No actions_\n\n");
        } else {
            for (i, action) in service.actions.iter().enumerate() {
                output.push_str(&format!("{}. {}\n", i + 1, action));
            }
            output.push('\n');
        }
    }

    if !plan.interrupts.is_empty() {
        output.push_str("## Interrupts\n\n");
        output.push_str("| Interrupt | Service | Status clear | Resources |\n");
        output.push_str("|---|---|---|---|\n");
        for irq in &plan.interrupts {
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                irq.name,
                irq.service,
                irq.status_clear.as_str(),
                irq.resources.join(", ")
            ));
        }
        output.push('\n');
    }

    if !plan.diagnostics.is_empty() {
        output.push_str("## Diagnostics\n\n");
        for diagnostic in &plan.diagnostics {
            output.push_str(&format!("- `{}` {}\n", diagnostic.code, diagnostic.message));
        }
        output.push('\n');
    }

    output
}

/// Render a plan as plain text, one extension point per line
///
/// `RuntimeInit: clk_init -> timer_init`
pub fn render_plan_text(plan: &Plan) -> String {
    let mut output = String::new();

    for service in &plan.extension_points {
        output.push_str(&format!(
            "{}: {}\n",
            service.name,
            service.actions.join(" -> ")
        ));
    }
    for irq in &plan.interrupts {
        output.push_str(&format!(
            "interrupt {} -> {} ({})\n",
            irq.name,
            irq.service,
            irq.status_clear.as_str()
        ));
    }
    for diagnostic in &plan.diagnostics {
        output.push_str(&format!("warning[{}]: {}\n", diagnostic.code, diagnostic.message));
    }
    output.push_str(&format!("digest: {}\n", plan.order_digest));

    output
}
