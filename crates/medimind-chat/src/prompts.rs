//! Fixed prompt text used by the orchestrator's helper entry points.

/// Sent instead of OCR output when the image contained no text
pub const NO_TEXT_DETECTED: &str = "No text detected in image.";

/// Log entry recorded for a medical image upload
pub const MEDICAL_IMAGE_UPLOAD_NOTE: &str = "I've uploaded a medical image for analysis.";

pub const MEDICAL_IMAGE_INSTRUCTION: &str = "Analyze this medical image in depth. Identify all visible anatomical structures, potential abnormalities, and relevant medical findings. Compare it to normal medical standards. Explain possible conditions with causes, symptoms, and next diagnostic steps. Provide insights based on visual patterns, color variations, and any visible anomalies.";

pub fn diagnosis_prompt(symptoms: &str) -> String {
    format!("Patient symptoms: {}. Provide a possible diagnosis and recommended cure.", symptoms)
}

pub fn prescription_prompt(prescription_text: &str) -> String {
    format!(
        "Parse the following prescription text and list the medication, dosage, and timing details: {}",
        prescription_text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates() {
        assert_eq!(
            diagnosis_prompt("fever, cough"),
            "Patient symptoms: fever, cough. Provide a possible diagnosis and recommended cure."
        );
        assert!(prescription_prompt("Amoxicillin 500mg")
            .ends_with("timing details: Amoxicillin 500mg"));
    }
}
