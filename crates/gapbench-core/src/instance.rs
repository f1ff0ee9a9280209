//! Generalized assignment instances and their text format.
//!
//! An instance file is whitespace-delimited: a `nbAgents nbTasks` header,
//! `nbAgents` profit rows of `nbTasks` integers, `nbAgents` capacity-cost
//! rows of the same width, and a final capacity-limit vector of `nbAgents`
//! integers. Blank lines are skipped; content after the capacity vector is
//! ignored.

use tracing::debug;

/// Errors raised while reading or constructing an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceError {
    /// Header line is not `nbAgents nbTasks` with a positive agent count.
    Header { line: usize },
    /// Declared agent count exceeds the configured maximum.
    AgentLimit { nb_agents: usize, max_agents: usize },
    /// A token failed integer parsing.
    Token { line: usize, token: String },
    /// A row holds the wrong number of entries.
    RowLength {
        section: &'static str,
        index: usize,
        expected: usize,
        found: usize,
    },
    /// The source ran out of lines before all sections were read.
    Truncated { expected: usize, found: usize },
    /// In-memory construction with inconsistent matrix shapes.
    Shape { reason: String },
}

impl InstanceError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            InstanceError::Header { .. } => "INSTANCE_INVALID_HEADER",
            InstanceError::AgentLimit { .. } => "INSTANCE_AGENT_LIMIT",
            InstanceError::Token { .. } => "INSTANCE_INVALID_TOKEN",
            InstanceError::RowLength { .. } => "INSTANCE_ROW_LENGTH",
            InstanceError::Truncated { .. } => "INSTANCE_TRUNCATED",
            InstanceError::Shape { .. } => "INSTANCE_INVALID_SHAPE",
        }
    }
}

impl std::fmt::Display for InstanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceError::Header { line } => write!(
                f,
                "[{}] Line {} is not a valid `nbAgents nbTasks` header",
                self.code(),
                line
            ),
            InstanceError::AgentLimit {
                nb_agents,
                max_agents,
            } => write!(
                f,
                "[{}] Instance declares {} agents but the configured maximum is {}",
                self.code(),
                nb_agents,
                max_agents
            ),
            InstanceError::Token { line, token } => write!(
                f,
                "[{}] Token `{}` on line {} is not an integer",
                self.code(),
                token,
                line
            ),
            InstanceError::RowLength {
                section,
                index,
                expected,
                found,
            } => write!(
                f,
                "[{}] Row {} of section `{}` holds {} entries (expected {})",
                self.code(),
                index,
                section,
                found,
                expected
            ),
            InstanceError::Truncated { expected, found } => write!(
                f,
                "[{}] Source ended after {} content lines (expected {})",
                self.code(),
                found,
                expected
            ),
            InstanceError::Shape { reason } => {
                write!(f, "[{}] Instance shape invalid: {}", self.code(), reason)
            }
        }
    }
}

impl std::error::Error for InstanceError {}

/// An immutable generalized assignment instance.
///
/// Shape invariants hold by construction: `profit` and `capacity_cost` are
/// rectangular `nb_agents x nb_tasks` matrices and `capacity_limit` has one
/// entry per agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    name: String,
    nb_agents: usize,
    nb_tasks: usize,
    profit: Vec<Vec<i64>>,
    capacity_cost: Vec<Vec<i64>>,
    capacity_limit: Vec<i64>,
}

impl Instance {
    /// Construct an instance from in-memory matrices.
    ///
    /// Dimensions are derived from the data: the agent count from
    /// `capacity_limit`, the task count from the first profit row. The task
    /// count may be zero; the agent count may not.
    pub fn new(
        name: impl Into<String>,
        profit: Vec<Vec<i64>>,
        capacity_cost: Vec<Vec<i64>>,
        capacity_limit: Vec<i64>,
    ) -> Result<Self, InstanceError> {
        let nb_agents = capacity_limit.len();
        if nb_agents == 0 {
            return Err(InstanceError::Shape {
                reason: "capacity_limit is empty".to_string(),
            });
        }
        if profit.len() != nb_agents {
            return Err(InstanceError::Shape {
                reason: format!("profit has {} rows for {} agents", profit.len(), nb_agents),
            });
        }
        if capacity_cost.len() != nb_agents {
            return Err(InstanceError::Shape {
                reason: format!(
                    "capacity_cost has {} rows for {} agents",
                    capacity_cost.len(),
                    nb_agents
                ),
            });
        }

        let nb_tasks = profit[0].len();
        for (index, row) in profit.iter().enumerate() {
            if row.len() != nb_tasks {
                return Err(InstanceError::Shape {
                    reason: format!(
                        "profit row {} holds {} entries (expected {})",
                        index,
                        row.len(),
                        nb_tasks
                    ),
                });
            }
        }
        for (index, row) in capacity_cost.iter().enumerate() {
            if row.len() != nb_tasks {
                return Err(InstanceError::Shape {
                    reason: format!(
                        "capacity_cost row {} holds {} entries (expected {})",
                        index,
                        row.len(),
                        nb_tasks
                    ),
                });
            }
        }

        Ok(Self {
            name: name.into(),
            nb_agents,
            nb_tasks,
            profit,
            capacity_cost,
            capacity_limit,
        })
    }

    /// Parse an instance from whitespace-delimited text.
    ///
    /// # Errors
    ///
    /// Fails when the header, row lengths, or capacity-vector length are
    /// inconsistent with the declared counts, when any token fails integer
    /// parsing, or when the declared agent count exceeds `max_agents`.
    pub fn parse(name: &str, source: &str, max_agents: usize) -> Result<Self, InstanceError> {
        let content: Vec<(usize, &str)> = source
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line))
            .filter(|(_, line)| !line.trim().is_empty())
            .collect();

        let Some(&(header_line, header)) = content.first() else {
            return Err(InstanceError::Truncated {
                expected: 1,
                found: 0,
            });
        };

        let header_tokens: Vec<&str> = header.split_whitespace().collect();
        if header_tokens.len() != 2 {
            return Err(InstanceError::Header { line: header_line });
        }
        let nb_agents = parse_count(header_tokens[0], header_line)?;
        let nb_tasks = parse_count(header_tokens[1], header_line)?;
        if nb_agents == 0 {
            return Err(InstanceError::Header { line: header_line });
        }
        if nb_agents > max_agents {
            return Err(InstanceError::AgentLimit {
                nb_agents,
                max_agents,
            });
        }

        // Header, two matrix sections, capacity vector.
        let expected_lines = 2 + 2 * nb_agents;
        if content.len() < expected_lines {
            return Err(InstanceError::Truncated {
                expected: expected_lines,
                found: content.len(),
            });
        }
        let mut cursor = content.iter().skip(1).copied();

        let mut profit = Vec::with_capacity(nb_agents);
        for index in 0..nb_agents {
            let (line_no, line) = cursor.next().unwrap_or((0, ""));
            profit.push(parse_row(line, line_no, "profit", index, nb_tasks)?);
        }

        let mut capacity_cost = Vec::with_capacity(nb_agents);
        for index in 0..nb_agents {
            let (line_no, line) = cursor.next().unwrap_or((0, ""));
            capacity_cost.push(parse_row(line, line_no, "capacity_cost", index, nb_tasks)?);
        }

        let (line_no, line) = cursor.next().unwrap_or((0, ""));
        let capacity_limit = parse_row(line, line_no, "capacity_limit", 0, nb_agents)?;

        debug!(
            component = "instance",
            operation = "parse",
            status = "success",
            instance = name,
            nb_agents,
            nb_tasks,
            "Parsed instance"
        );

        Ok(Self {
            name: name.to_string(),
            nb_agents,
            nb_tasks,
            profit,
            capacity_cost,
            capacity_limit,
        })
    }

    /// Instance identifier used for logging and file resolution.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of agents.
    pub fn nb_agents(&self) -> usize {
        self.nb_agents
    }

    /// Number of tasks.
    pub fn nb_tasks(&self) -> usize {
        self.nb_tasks
    }

    /// Profit matrix, one row per agent.
    pub fn profit(&self) -> &[Vec<i64>] {
        &self.profit
    }

    /// Capacity-cost matrix, one row per agent.
    pub fn capacity_cost(&self) -> &[Vec<i64>] {
        &self.capacity_cost
    }

    /// Capacity budget per agent.
    pub fn capacity_limit(&self) -> &[i64] {
        &self.capacity_limit
    }

    /// Re-serialize the instance in its input text format.
    pub fn to_input_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{} {}\n", self.nb_agents, self.nb_tasks));
        for row in &self.profit {
            out.push_str(&join_row(row));
        }
        for row in &self.capacity_cost {
            out.push_str(&join_row(row));
        }
        out.push_str(&join_row(&self.capacity_limit));
        out
    }
}

fn join_row(row: &[i64]) -> String {
    let mut line = row
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    line.push('\n');
    line
}

fn parse_count(token: &str, line: usize) -> Result<usize, InstanceError> {
    token.parse().map_err(|_| InstanceError::Token {
        line,
        token: token.to_string(),
    })
}

fn parse_row(
    line: &str,
    line_no: usize,
    section: &'static str,
    index: usize,
    expected: usize,
) -> Result<Vec<i64>, InstanceError> {
    let mut values = Vec::with_capacity(expected);
    for token in line.split_whitespace() {
        let value: i64 = token.parse().map_err(|_| InstanceError::Token {
            line: line_no,
            token: token.to_string(),
        })?;
        values.push(value);
    }
    if values.len() != expected {
        return Err(InstanceError::RowLength {
            section,
            index,
            expected,
            found: values.len(),
        });
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "2 2\n3 1\n2 4\n1 1\n1 1\n1 1\n";

    #[test]
    fn parse_small_instance() {
        let instance = Instance::parse("small", SMALL, 80).unwrap();
        assert_eq!(instance.name(), "small");
        assert_eq!(instance.nb_agents(), 2);
        assert_eq!(instance.nb_tasks(), 2);
        assert_eq!(instance.profit(), &[vec![3, 1], vec![2, 4]]);
        assert_eq!(instance.capacity_cost(), &[vec![1, 1], vec![1, 1]]);
        assert_eq!(instance.capacity_limit(), &[1, 1]);
    }

    #[test]
    fn parse_skips_blank_lines() {
        let source = "\n2 2\n\n3 1\n2 4\n\n\n1 1\n1 1\n1 1\n\n";
        let instance = Instance::parse("blanks", source, 80).unwrap();
        assert_eq!(instance.profit(), &[vec![3, 1], vec![2, 4]]);
    }

    #[test]
    fn parse_ignores_content_after_capacity_vector() {
        let source = format!("{SMALL}99 99\n");
        let instance = Instance::parse("tail", &source, 80).unwrap();
        assert_eq!(instance.capacity_limit(), &[1, 1]);
    }

    #[test]
    fn parse_accepts_negative_values() {
        let source = "1 2\n-3 5\n2 2\n-1\n";
        let instance = Instance::parse("negative", source, 80).unwrap();
        assert_eq!(instance.profit(), &[vec![-3, 5]]);
        assert_eq!(instance.capacity_limit(), &[-1]);
    }

    #[test]
    fn parse_rejects_bad_header() {
        let err = Instance::parse("bad", "2\n", 80).unwrap_err();
        assert_eq!(err, InstanceError::Header { line: 1 });

        let err = Instance::parse("bad", "0 2\n", 80).unwrap_err();
        assert_eq!(err, InstanceError::Header { line: 1 });

        let err = Instance::parse("bad", "2 2 7\n", 80).unwrap_err();
        assert_eq!(err, InstanceError::Header { line: 1 });
    }

    #[test]
    fn parse_rejects_agent_count_over_limit() {
        let err = Instance::parse("big", SMALL, 1).unwrap_err();
        assert_eq!(
            err,
            InstanceError::AgentLimit {
                nb_agents: 2,
                max_agents: 1
            }
        );
    }

    #[test]
    fn parse_rejects_short_profit_row() {
        let source = "2 2\n3\n2 4\n1 1\n1 1\n1 1\n";
        let err = Instance::parse("short", source, 80).unwrap_err();
        assert_eq!(
            err,
            InstanceError::RowLength {
                section: "profit",
                index: 0,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn parse_rejects_long_capacity_cost_row() {
        let source = "2 2\n3 1\n2 4\n1 1\n1 1 9\n1 1\n";
        let err = Instance::parse("long", source, 80).unwrap_err();
        assert_eq!(
            err,
            InstanceError::RowLength {
                section: "capacity_cost",
                index: 1,
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn parse_rejects_wrong_capacity_vector_length() {
        let source = "2 2\n3 1\n2 4\n1 1\n1 1\n1\n";
        let err = Instance::parse("caplen", source, 80).unwrap_err();
        assert_eq!(
            err,
            InstanceError::RowLength {
                section: "capacity_limit",
                index: 0,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn parse_rejects_non_integer_token() {
        let source = "2 2\n3 x\n2 4\n1 1\n1 1\n1 1\n";
        let err = Instance::parse("token", source, 80).unwrap_err();
        assert_eq!(
            err,
            InstanceError::Token {
                line: 2,
                token: "x".to_string()
            }
        );
    }

    #[test]
    fn parse_rejects_truncated_source() {
        let source = "2 2\n3 1\n2 4\n";
        let err = Instance::parse("cut", source, 80).unwrap_err();
        assert_eq!(
            err,
            InstanceError::Truncated {
                expected: 6,
                found: 3
            }
        );

        let err = Instance::parse("empty", "", 80).unwrap_err();
        assert_eq!(
            err,
            InstanceError::Truncated {
                expected: 1,
                found: 0
            }
        );
    }

    #[test]
    fn round_trip_preserves_values() {
        let instance = Instance::parse("rt", SMALL, 80).unwrap();
        let text = instance.to_input_text();
        let reparsed = Instance::parse("rt", &text, 80).unwrap();
        assert_eq!(instance, reparsed);
        assert_eq!(text, SMALL);
    }

    #[test]
    fn new_validates_shapes() {
        let instance = Instance::new(
            "mem",
            vec![vec![3, 1], vec![2, 4]],
            vec![vec![1, 1], vec![1, 1]],
            vec![1, 1],
        )
        .unwrap();
        assert_eq!(instance.nb_agents(), 2);
        assert_eq!(instance.nb_tasks(), 2);

        let err = Instance::new("mem", vec![vec![3, 1]], vec![vec![1, 1]], vec![1, 1]).unwrap_err();
        assert!(matches!(err, InstanceError::Shape { .. }));

        let err = Instance::new(
            "mem",
            vec![vec![3, 1], vec![2]],
            vec![vec![1, 1], vec![1, 1]],
            vec![1, 1],
        )
        .unwrap_err();
        assert!(matches!(err, InstanceError::Shape { .. }));
    }

    #[test]
    fn new_accepts_zero_tasks() {
        let instance = Instance::new("zero", vec![vec![]], vec![vec![]], vec![5]).unwrap();
        assert_eq!(instance.nb_agents(), 1);
        assert_eq!(instance.nb_tasks(), 0);
    }

    #[test]
    fn error_display_includes_code() {
        let err = InstanceError::Token {
            line: 3,
            token: "x".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("INSTANCE_INVALID_TOKEN"));
        assert!(msg.contains("line 3"));
    }
}
