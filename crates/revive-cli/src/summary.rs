use console::Style;
use revive_core::edit::EditParameters;
use revive_core::filter::FilterPreset;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    disabled: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            disabled: Style::new().dim().yellow(),
        }
    }
}

/// Print the pending edit before it is committed.
pub fn print_edit_summary(params: &EditParameters, filter: FilterPreset, inputs: usize) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Revive Edit"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(11)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Inputs"),
        s.value.apply_to(inputs)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Rotation"),
        s.value.apply_to(params.rotation())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Flip"),
        if params.is_flipped() {
            s.value.apply_to("horizontal".to_string())
        } else {
            s.disabled.apply_to("off".to_string())
        }
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Straighten"),
        s.value.apply_to(format!("{:+.1}°", params.straighten_deg()))
    );

    match params.crop_box() {
        Some(rect) => {
            let r = rect.normalized();
            println!(
                "  {:<14}{}",
                s.label.apply_to("Crop"),
                s.value.apply_to(format!(
                    "{:.0}x{:.0} at ({:.0}, {:.0})",
                    r.width, r.height, r.x, r.y
                ))
            );
        }
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Crop"),
            s.disabled.apply_to("none")
        ),
    }

    if filter.is_none() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Filter"),
            s.disabled.apply_to("none")
        );
    } else {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Filter"),
            s.value.apply_to(filter)
        );
    }
    println!();
}
