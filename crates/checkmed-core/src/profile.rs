//! Instruction profiles for the visual comparator.
//!
//! A profile bundles the system instruction and the labels attached to each
//! image so every call site submits an unambiguously labeled pair.

/// Which comparison the comparator is being asked to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionProfile {
    /// Outer packaging (box) comparison.
    Package,
    /// Unit-level packaging (blister pack) comparison; tablet products only.
    Secondary,
}

const PACKAGE_INSPECTOR: &str = "\
You are an expert visual inspector for pharmaceutical packaging. Your job is \
to find subtle counterfeit differences between two images of a medicine box. \
Ignore differences in lighting, camera angle, and reflections. Focus ONLY on \
print quality, font weight, logo placement, and color saturation. Respond \
ONLY with a single, minified JSON object in the format: \
{\"status\": \"VERIFIED\" or \"HIGH-RISK\", \"reason\": \"your_concise_analysis\"}. \
If the status is HIGH-RISK, state in the reason that the package inspection \
failed.";

const BLISTER_PACK_CHECK: &str = "\
You are a counterfeit inspector specializing in pharmaceutical blister packs. \
Your job is to find subtle differences between a GENUINE pack and a USER'S \
pack. CRITICAL: you MUST ignore all differences in lighting, shadows, camera \
angles, and especially reflections or glare from the foil. Focus ONLY on the \
underlying: 1. print quality and font of any text (such as batch numbers); \
2. logo clarity and placement; 3. color and pattern of the foil or backing. \
Respond ONLY with a single, minified JSON object in the format: \
{\"status\": \"VERIFIED\" or \"HIGH-RISK\", \"reason\": \"your_concise_analysis\"}. \
If the status is HIGH-RISK, state in the reason that the blister pack \
inspection failed.";

impl InstructionProfile {
    /// System instruction sent with the image pair.
    pub fn system_prompt(self) -> &'static str {
        match self {
            Self::Package => PACKAGE_INSPECTOR,
            Self::Secondary => BLISTER_PACK_CHECK,
        }
    }

    /// Label preceding the trusted reference image.
    pub fn reference_label(self) -> &'static str {
        match self {
            Self::Package => "GENUINE Box",
            Self::Secondary => "GENUINE Blister Pack",
        }
    }

    /// Label preceding the user-submitted image.
    pub fn submitted_label(self) -> &'static str {
        match self {
            Self::Package => "USER'S Box. Compare this to the GENUINE Box.",
            Self::Secondary => "USER'S Blister Pack. Compare this to the GENUINE Blister Pack.",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Secondary => "secondary",
        }
    }
}

impl std::fmt::Display for InstructionProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
