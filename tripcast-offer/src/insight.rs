use async_trait::async_trait;
use tripcast_core::supplier::InsightService;

/// Offline insight text built from a fixed template.
pub struct TemplateInsightService;

#[async_trait]
impl InsightService for TemplateInsightService {
    async fn describe(
        &self,
        country_name: &str,
        month_label: &str,
        price: i64,
        stops: u32,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let routing = match stops {
            0 => "nonstop both ways".to_string(),
            1 => "with a single connection".to_string(),
            n => format!("with {} connections in total", n),
        };
        Ok(format!(
            "{} in {} is a strong pick: fares from PHP {}, {}.",
            country_name,
            month_label,
            group_thousands(price),
            routing
        ))
    }
}

/// `16935` -> `16,935`
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0 {
        out.insert(0, '-');
    }
    out
}
