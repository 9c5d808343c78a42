//! Outline rendering of report trees.
//!
//! Suites print as `+ label`, tests as `- label`, followed by ` <owner>` when
//! the test knows its implementing code. Each level indents by two spaces.

use std::fmt::{self, Display, Formatter};

use super::{ReportNode, SuiteNode, TestNode};

const INDENT: &str = "  ";

struct Outline<'a> {
    node: &'a ReportNode,
    depth: usize,
}

impl Display for Outline<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for _ in 0..self.depth {
            f.write_str(INDENT)?;
        }
        match self.node {
            ReportNode::Suite(suite) => {
                writeln!(f, "+ {}", suite.label)?;
                for child in &suite.children {
                    write!(
                        f,
                        "{}",
                        Self {
                            node: child,
                            depth: self.depth + 1,
                        }
                    )?;
                }
            }
            ReportNode::Test(TestNode { label, owner, .. }) => {
                write!(f, "- {label}")?;
                if let Some(owner) = owner {
                    write!(f, " <{owner}>")?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl Display for ReportNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Outline { node: self, depth: 0 })
    }
}

impl Display for SuiteNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "+ {}", self.label)?;
        for child in &self.children {
            write!(f, "{}", Outline { node: child, depth: 1 })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn renders_nested_outline() {
        let mut scenario = SuiteNode::new("Scenario: s");
        scenario.push(TestNode::new("Given a").with_owner("Steps"));
        scenario.push(TestNode::new("[PENDING] When b"));
        scenario.push(SuiteNode::new("given.story"));
        let mut story = SuiteNode::new("Story");
        story.push(scenario);

        let expected = concat!(
            "+ Story\n",
            "  + Scenario: s\n",
            "    - Given a <Steps>\n",
            "    - [PENDING] When b\n",
            "    + given.story\n",
        );
        assert_eq!(story.to_string(), expected);
        assert_eq!(ReportNode::from(story).to_string(), expected);
    }
}
