use crate::error::{CheckError, Result};
use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Verdict {
    Ok,
    Alert,
}

impl Verdict {
    /// Value written to the CI variable.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Ok => "passed",
            Verdict::Alert => "failed",
        }
    }

    pub fn is_alert(&self) -> bool {
        *self == Verdict::Alert
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arithmetic mean, summed left to right. An empty input is an error rather
/// than NaN; `label` names the series in that error.
pub fn average<I>(label: &str, values: I) -> Result<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0_f64, 0_usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        return Err(CheckError::EmptyInput(label.to_string()));
    }

    let avg = sum / count as f64;
    if !avg.is_finite() {
        return Err(CheckError::NonFiniteAverage);
    }

    Ok(avg)
}

/// Strictly greater than alerts; an average equal to the threshold passes.
pub fn classify(average: f64, threshold: f64) -> Verdict {
    if average > threshold {
        Verdict::Alert
    } else {
        Verdict::Ok
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Evaluation {
    pub metric: String,
    pub average: f64,
    pub threshold: f64,
    pub verdict: Verdict,
}

impl Evaluation {
    pub fn new(metric: &str, average: f64, threshold: f64) -> Self {
        Self {
            metric: metric.to_string(),
            average,
            threshold,
            verdict: classify(average, threshold),
        }
    }

    pub fn message(&self) -> String {
        match self.verdict {
            Verdict::Alert => format!(
                "ALERT! avg {}: {:.6} (which is more than {:.6})",
                self.metric, self.average, self.threshold
            ),
            Verdict::Ok => format!(
                "No worries, the avg {} is {:.6} (which is less than {:.6})",
                self.metric, self.average, self.threshold
            ),
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn average_is_sum_over_count() {
        let_assert!(Ok(avg) = average("m", vec![2.0, 4.0]));
        check!(avg == 3.0);

        let values = vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7];
        let expected = values.iter().fold(0.0, |acc, v| acc + v) / values.len() as f64;
        let_assert!(Ok(avg) = average("m", values));
        check!(avg == expected);
    }

    #[test]
    fn average_of_single_value_is_that_value() {
        let_assert!(Ok(avg) = average("m", vec![-7.25]));
        check!(avg == -7.25);
    }

    #[test]
    fn average_of_nothing_is_an_error() {
        let_assert!(Err(CheckError::EmptyInput(label)) = average("mem.used", Vec::new()));
        check!(label == "mem.used");
    }

    #[test]
    fn average_that_overflows_is_an_error() {
        let_assert!(Err(CheckError::NonFiniteAverage) = average("m", vec![f64::MAX, f64::MAX]));
    }

    #[test]
    fn classify_alerts_only_above_threshold() {
        check!(classify(1.5, 1.0) == Verdict::Alert);
        check!(classify(0.5, 1.0) == Verdict::Ok);
        check!(classify(-3.0, -4.0) == Verdict::Alert);
    }

    #[test]
    fn classify_at_threshold_passes() {
        for t in [0.0, 1.0, -2.5, 1e12] {
            check!(classify(t, t) == Verdict::Ok);
        }
    }

    #[test]
    fn alert_message_carries_average_and_threshold() {
        let evaluation = Evaluation::new("kubernetes.pod.cpu.usage_rate", 3.0, 2.5);

        check!(evaluation.verdict == Verdict::Alert);
        check!(
            evaluation.message()
                == "ALERT! avg kubernetes.pod.cpu.usage_rate: 3.000000 (which is more than 2.500000)"
        );
    }

    #[test]
    fn ok_message_carries_average_and_threshold() {
        let evaluation = Evaluation::new("kubernetes.pod.cpu.usage_rate", 3.0, 3.5);

        check!(evaluation.verdict == Verdict::Ok);
        check!(
            evaluation.to_string()
                == "No worries, the avg kubernetes.pod.cpu.usage_rate is 3.000000 (which is less than 3.500000)"
        );
    }

    #[test]
    fn verdict_maps_to_ci_variable_value() {
        check!(Verdict::Ok.as_str() == "passed");
        check!(Verdict::Alert.as_str() == "failed");
    }
}
