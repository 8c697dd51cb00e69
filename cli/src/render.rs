use mobilenet_core::Classification;

/// Rows shown for a prediction.
pub const MAX_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
	Predictions(Vec<Classification>),
	Error(String),
}

impl Outcome {
	pub const fn is_error(&self) -> bool {
		matches!(self, Self::Error(_))
	}
}

/// Probability as a percentage with one decimal, e.g. `0.754` becomes `75.4`.
pub fn percent(prob: f64) -> f64 {
	(prob * 1000.0).round() / 10.0
}

pub fn render(outcome: &Outcome) -> String {
	match outcome {
		Outcome::Error(message) if message.is_empty() => "Error: Unknown error".to_string(),
		Outcome::Error(message) => format!("Error: {message}"),
		Outcome::Predictions(items) if items.is_empty() => "No predictions.".to_string(),
		Outcome::Predictions(items) => {
			let width = items
				.iter()
				.take(MAX_ROWS)
				.map(|item| item.label.chars().count())
				.max()
				.unwrap_or_default();

			items
				.iter()
				.take(MAX_ROWS)
				.map(|item| format!("{:<width$}  {}%", item.label, percent(item.prob)))
				.collect::<Vec<_>>()
				.join("\n")
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn percentages_have_one_decimal() {
		assert!((percent(0.754) - 75.4).abs() < f64::EPSILON);
		assert!((percent(1.0) - 100.0).abs() < f64::EPSILON);
		assert!((percent(0.00049) - 0.0).abs() < f64::EPSILON);
	}

	#[test]
	fn predictions_render_as_aligned_rows() {
		let outcome = Outcome::Predictions(vec![
			Classification::new("tabby", 0.5),
			Classification::new("tiger cat", 0.25),
		]);

		assert_eq!(render(&outcome), "tabby      50%\ntiger cat  25%");
	}

	#[test]
	fn at_most_five_rows_are_shown() {
		let items = (0..8).map(|i| Classification::new(i.to_string(), 0.1)).collect();

		assert_eq!(render(&Outcome::Predictions(items)).lines().count(), MAX_ROWS);
	}

	#[test]
	fn empty_results_and_errors_have_messages() {
		assert_eq!(render(&Outcome::Predictions(vec![])), "No predictions.");
		assert_eq!(render(&Outcome::Error("boom".to_string())), "Error: boom");
		assert_eq!(render(&Outcome::Error(String::new())), "Error: Unknown error");
	}
}
