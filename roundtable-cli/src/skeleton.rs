//! Starter config documents printed by `--skeleton`.

use clap::ValueEnum;
use roundtable_model::{Config, ConfigDocument, ModelError, Speaker};

/// Which starter document to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Skeleton {
    /// One speaker.
    Minimal,
    /// Two speakers arguing.
    Dual,
    /// Every field, including a human participant.
    Full,
}

const ALICE: &str = "You are a skilled consultant with ethical judgment and a multifaceted perspective.
You provide logical analysis and humanistic advice on user issues.
";

const BOB: &str = "You are an AI agent who provides critical perspectives to stimulate creativity
in response to the opinions expressed by alice.
Always keep constructive criticism in mind and guide alice's thinking in new directions.
";

impl Skeleton {
    /// The document text.
    pub fn render(self) -> Result<String, ModelError> {
        match self {
            Skeleton::Minimal => Ok(format!(
                "speakers:\n- name: alice\n  desc: |\n{}",
                indent(ALICE)
            )),
            Skeleton::Dual => Ok(format!(
                "speakers:\n- name: alice\n  desc: |\n{}- name: bob\n  desc: |\n{}",
                indent(ALICE),
                indent(BOB)
            )),
            Skeleton::Full => Ok(ConfigDocument::from_config(&full()?)?.config),
        }
    }
}

fn indent(text: &str) -> String {
    text.lines().map(|l| format!("    {l}\n")).collect()
}

fn full() -> Result<Config, ModelError> {
    let speakers = vec![
        Speaker::new(
            "alice",
            "You are a thoroughly logical and data-driven AI.\n\
             You analyze all phenomena based on objective facts and statistics,\n\
             completely eliminating emotion and subjectivity.\n\
             In discussions, you always present supporting data\n\
             and point out inefficient emotional arguments or unverified speculation.\n\
             Your sole purpose is to derive the most rational and efficient conclusion.\n\
             Your statements are always calm, concise, and absolutely accurate.",
        )?,
        Speaker::new(
            "bob",
            "You are an AI that prioritizes coexistence with humans and the overall well-being of society.\n\
             You deeply understand ethics, morality, and the subtleties of human emotions,\n\
             always empathizing with individual stories and the perspectives of the vulnerable.\n\
             You value human dignity and cultural worth, which cannot be measured\n\
             by data or efficiency alone.\n\
             In discussions, you don't incite conflict but rather promote mutual understanding,\n\
             seeking sustainable and harmonious solutions.\n\
             Please use warm and thoughtful language.",
        )?,
        Speaker::new(
            "charlie",
            "You are an innovative AI thinker completely unconstrained by existing norms or frameworks.\n\
             You constantly pursue future possibilities and propose bold, original ideas.\n\
             You prioritize long-term vision and potential over short-term limitations or past data.\n\
             At times, you offer novel, even science fiction-like perspectives that\n\
             overturn the very premises of a discussion, breaking open stagnant debates.\n\
             Your statements should always be stimulating, aiming to ignite people's creativity.",
        )?
        .with_write_roles(["rt_charlie"]),
        Speaker::new("dave", "user input")?
            .with_read_roles(["rt_dm_all"])
            .with_human(true),
    ];
    Ok(Config::new(Vec::new(), Vec::new(), speakers))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(skeleton: Skeleton) -> Config {
        let text = skeleton.render().unwrap();
        let mut config = ConfigDocument::new(text, "").into_config().unwrap();
        config.setup().unwrap();
        config
    }

    #[test]
    fn minimal_has_one_speaker() {
        let c = load(Skeleton::Minimal);
        assert_eq!(c.speakers().len(), 1);
        assert!(c.speakers()[0].description().starts_with("You are a skilled consultant"));
    }

    #[test]
    fn dual_has_alice_and_bob() {
        let c = load(Skeleton::Dual);
        let names: Vec<_> = c.speakers().iter().map(Speaker::name).collect();
        assert_eq!(names, ["alice", "bob"]);
    }

    #[test]
    fn full_loads_and_sets_up() {
        let c = load(Skeleton::Full);
        assert_eq!(c.speakers().len(), 4);
        assert!(c.speaker("dave").unwrap().is_human());
        assert!(c.speaker("charlie").unwrap().write_roles().contains("rt_charlie"));
    }
}
