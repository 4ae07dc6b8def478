use minijinja::{context, Environment};

const SEED_INPUT_TEMPLATE: &str = include_str!("templates/seed_input.j2");
const WELCOME_TEMPLATE: &str = include_str!("templates/welcome.j2");

/// Render the pre-seeded input line for a product name.
pub fn render_seed_input(product: &str) -> String {
    let mut env = Environment::new();
    if env.add_template("seed_input", SEED_INPUT_TEMPLATE).is_err() {
        return fallback_seed_input(product);
    }

    let Ok(template) = env.get_template("seed_input") else {
        return fallback_seed_input(product);
    };

    template
        .render(context! { product => product })
        .unwrap_or_else(|_| fallback_seed_input(product))
}

fn fallback_seed_input(product: &str) -> String {
    format!("my {} is not functioning properly.", product)
}

/// Render the assistant's welcome line for a company display name.
pub fn render_welcome(company: &str) -> String {
    let mut env = Environment::new();
    if env.add_template("welcome", WELCOME_TEMPLATE).is_err() {
        return fallback_welcome(company);
    }

    let Ok(template) = env.get_template("welcome") else {
        return fallback_welcome(company);
    };

    template
        .render(context! { company => company })
        .unwrap_or_else(|_| fallback_welcome(company))
}

fn fallback_welcome(company: &str) -> String {
    format!(
        "Welcome! I'm the {} AI support assistant. Tell me what product you're working with and what issue you're experiencing, and I'll help you troubleshoot.",
        company
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_input_interpolates_product() {
        assert_eq!(
            render_seed_input("Model 2400 Industrial Pump"),
            "my Model 2400 Industrial Pump is not functioning properly."
        );
    }

    #[test]
    fn seed_input_generic_fallback_wording() {
        assert_eq!(
            render_seed_input("product"),
            "my product is not functioning properly."
        );
    }

    #[test]
    fn welcome_names_the_company() {
        let line = render_welcome("Acme Tools");
        assert!(line.contains("Acme Tools"));
        assert!(line.contains("support assistant"));
    }
}
