//! HTML body for outbound incident reports.

use super::IncidentReport;

/// Render the report as a self-contained HTML document. All user-supplied
/// fields are escaped; images travel as attachments, not inline.
pub fn render(report: &IncidentReport) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ width: 90%; margin: 20px auto; border: 1px solid #ddd; border-radius: 8px; }}
        .header {{ background-color: #d90429; color: white; padding: 20px; text-align: center; }}
        .content {{ padding: 30px; }}
        .content table {{ width: 100%; border-collapse: collapse; }}
        .content th, .content td {{ padding: 12px; border: 1px solid #eee; text-align: left; }}
        .content th {{ background-color: #f9f9f9; width: 30%; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header"><h2>URGENT: Suspected Counterfeit Drug Report</h2></div>
        <div class="content">
            <p>This is an automated report of a suspected counterfeit drug, submitted by a
            CheckMed user who has consented to share this data. Images of the product are
            attached ({attachments} file(s)).</p>
            <table>
                <tr><th>Drug Name</th><td>{drug_name}</td></tr>
                <tr><th>Registration Number (user input)</th><td>{registration_number}</td></tr>
                <tr><th>Reason Flagged</th><td>{reason}</td></tr>
                <tr><th>Approximate Location</th><td>{location}</td></tr>
            </table>
            <p style="margin-top: 20px;">This data can be used to identify counterfeit
            hotspots. Please review the attached images.</p>
            <p><strong>The CheckMed Platform</strong></p>
        </div>
    </div>
</body>
</html>
"#,
        attachments = report.attachment_count(),
        drug_name = escape(&report.drug_name),
        registration_number = escape(&report.registration_number),
        reason = escape(&report.reason),
        location = escape(&report.location),
    )
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
