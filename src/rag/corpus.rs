//! Cooperative knowledge base embedded at startup.
//!
//! Each entry is one retrievable chunk; its position is its identity in the
//! embedding index. Deployments can swap the list for a YAML file through
//! `retrieval.corpus_path`.

use std::fs;
use std::path::Path;

use thiserror::Error;

pub const DEFAULT_CORPUS: &[&str] = &[
    r#"SERVICE APPLICATION
To apply for an electric-service connection under CEBECO III, a prospective consumer must:
• Fill out a membership form and pay the nominal membership fee.
• Attend a short Pre-Membership Orientation Seminar (PMES).
• Hire an accredited electrician to install house wiring compliant with the Philippine Building Code.
• Secure an electrical permit from the LGU’s Office of the Building Official.
• After inspection by CEBECO III, pay the service deposit/meter fee.
• Sign the service contract.
Once these steps are completed, the account is energized, and the applicant becomes a bonafide member-consumer of CEBECO III."#,
    r#"MAGNA CARTA
The Magna Carta for Residential Electricity Consumers guarantees:
• Safe, continuous, and reliable supply.
• Transparent unbundled billing.
• 48-hour written notice prior to disconnection for non-payment.
• The right to contest a bill and seek mediation with the ERC.
• Refund or credit if over-billing is proven.
Bill deposits are refundable after 3 consecutive years of prompt payment.
The Magna Carta applies to all Distribution Utilities (DUs), including electric cooperatives such as CEBECO III."#,
    r#"CONNECTION & DISCONNECTION
Reconnection is done within 24 hours after settlement of unpaid bills plus the reconnection fee.
Disconnections are NOT executed on weekends, holidays, or outside office hours.
Illegal use of electricity (e.g., meter tampering or jumper) is subject to immediate disconnection and penalties under RA 7832."#,
    r#"CUT-OFF DATES, DUE DATES, PENALTIES & DISCONNECTION SCHEDULE
• Bill due date: exactly nine (9) days after bill delivery.
• Scheduled cut-off dates (all “of the month”):
    – Asturias – 4th of the month
    – Balamban – 8th of the month
    – Aloguinsan – 10th of the month
    – Pinamungajan – 12th of the month
    – Cebu City Areas – 12th of the month
    – Special Bills – 14th of the month
    – Lutopan – 24th of the month
    – Toledo City – 27th of the month
• Disconnection crews operate between 8 AM and 5 PM on those dates.
• Unpaid balance by cut-off → immediate service suspension + 2% monthly surcharge.
  Reconnection requires settlement of all past-due bills, surcharges, and reconnection fee.
• One-time grace per billing cycle: payment of the current bill within 24 hours
  of the attempted cut-off will suspend that operation (customer must present
  proof of payment at any area office).

*Magna Carta for Residential Electricity Consumers* (ERC Res. No. 12-09) exceptions
that *CEBECO III* strictly honors:
  • Final Disconnection Notice (FDN) must be served ≥ 48 hours before cut-off.
  • *Suspension of cut-off* if the customer provides:
      – medical certificate for life-support equipment  
      – official permit for a funeral wake held at the premises  
      – evidence of non-receipt of the disconnection notice  
      – proof of a billing error charging multiple months at once  
      – payment of the current bill within 24 hours after the first cut-off attempt  
  • *No disconnections* on:
      – Fridays, weekends, national/local holidays, or the day before any of these  
      – Holy Week (Maundy Thursday through Easter Sunday)  
      – any ERC-declared moratorium days (e.g. grid emergencies or public calamities)  
  • *Automatic 30-day extension* after FDN for registered senior citizens,
    PWDs, or households with life-support equipment."#,
    r#"HISTORY & COVERAGE
CEBECO III (Cebu III Electric Cooperative, Inc.) was organized in 1979 and now serves:
• Toledo City
• Pinamungajan
• Aloguinsan
• Balamban
• Asturias
The cooperative operates multiple 69/13.2 kV substations and nearly 1,000 km of distribution lines.
Governance is via a Board of Directors elected by the member-consumers per district."#,
    r#"AFFILIATED AGENCIES
• NEA – Supervisory & technical/financial standards for cooperatives.
• ERC – Approval of retail rates & Magna Carta enforcement.
• DOE – National energy policy & renewable energy programs.
• LGU – Permits, right-of-way & disaster coordination."#,
    r#"NET METERING
Under RA 9513 (Renewable Energy Act), a consumer may install up to 100 kW of renewables (typically solar PV) and export surplus energy to the grid.
CEBECO III installs a bi-directional meter; the consumer is billed on net energy.
Excess exports earn credits equal to the generation charge minus line losses and administrative fees."#,
    r#"SERVICE CONTRACT / MEMBER RIGHTS
Members may vote at the Annual General Assembly, elect directors, and share in patronage refunds if declared.
The service contract requires the consumer to pay bills on time, keep wiring safe, and allow meter access."#,
    r#"ELECTRICITY RATES
Unbundled charges include:
• Generation
• Transmission
• Distribution
• Supply & Metering
• System Loss
• Universal Charges
• Taxes
Only Distribution, Supply, and Metering components are retained by CEBECO III and are ERC-regulated.
Generation cost fluctuates monthly; distribution charges remain until a new ERC rate case is approved."#,
    r#"CAPITAL PROJECTS
All major Capital Expenditures (CAPEX), such as new substations, line uprating, and SCADA, require ERC approval.
Projects have reduced system loss from over 13% in 2005 to less than 8% today."#,
    r#"AREA OFFICES & PAYMENT CHANNELS (as of April 2025)
• Toledo City Main Office – Mon–Fri 8 AM–5 PM
• Balamban Area Office – Mon–Fri 8 AM–5 PM
• Asturias Service Desk – Tue & Thu 9 AM–3 PM
Payments accepted via:
• GCash “CEBECO III” biller
• Palawan Pawnshop
• 7-Eleven CliQQ
• All Cebuana branches
Note: Post-dated cheques are not accepted."#,
    r#"POWER-SITUATION BULLETIN (typical)
• NGCP Visayas grid is on YELLOW ALERT when available reserve is less than regulating plus contingency.
• During Yellow/Red alerts, CEBECO III may receive a load curtailment order and implement manual load shedding by feeder (30-minute blocks).
Real-time updates are posted on the official Facebook page and announced via local radio (station DYRD / 102.7 FM)."#,
    r#"REPORTING AN OUTAGE
Message the official Facebook page or call the 24×7 hotline: (032) 467-9-112.
Provide the following information:
• Account Name
• Consumer ID
• Exact Address
• Any visible cause (e.g., tree on line)
A crew is dispatched based on feeder priority and public safety considerations."#,
    r#"BILLING & PAYMENT FAQ
• You may request a PDF e-bill via email at ebill@cebeco3.com.
• Senior Citizen Discount: 5% on the first 100 kWh for the account registered under the senior’s name and address.
• Re-print of Statement of Account (SOA) is free for the current month; ₱20 per copy for previous months."#,
    r#"CONTACT INFORMATION & HOTLINES
Area office contact numbers (24×7 hotlines):
    • Asturias – 0927-655-6054
    • Balamban – 0915-163-1134
    • Aloguinsan – 0927-655-6053
    • Pinamungajan – 0906-411-4564
    • Bunga, Toledo City – 0917-505-6070
    • Main Office, Toledo City – 0917-624-4406
General email: cebeco_iii@cebeco3.com.ph
Website: https://www.cebeco3.com.ph/contact-us/"#,
    r#"KEY PERSONNEL (as of May 2025)
• Virgilio C. Fortich Jr. – General Manager
  • Contact #: (032) 467-8557
  • Email: TBA@cebeco3.com.ph

• Willard C. Sayson – Assistant General Manager
  • Contact #: (032) 467-8557
  • Email: wc_sayson@cebeco3.com.ph

• Edgardo H. Hernaez Jr. – TSD Manager
  • Contact #: (032) 467-8557
  • Email: radi_hernaez@cebeco3.com.ph

• Gilbert P. Provida – Network Services Division Manager / O&M Section Head - Toledo City
  • Contact #: (032) 467-8557
  • Email: gp_provida@cebeco3.com.ph

• Eric D. Itable – Distribution System Automation Head
  • Contact #: (032) 467-8557
  • Email: ed_itable@cebeco3.com.ph

• Mariano T. Pañares III – O&M Supervisor - Asturias
  • Contact #: (032) 464-9220
  • Email: mt_pañares@cebeco3.com.ph

• Bryan P. Bael – O&M Supervisor - Aloguinsan
  • Contact #: (032) 469-9026
  • Email: bp_bael@cebeco3.com.ph

• Rolly L. Cabañero – O&M Supervisor - Pinamungajan
  • Contact #: (032) 468-9671
  • Email: rl_cabanero@cebeco3.com.ph

• Kim Derrick V. Rosell – O&M Supervisor - Balamban
  • Contact #: (032) 465-3016
  • Email: kv_rosell@cebeco3.com.ph

• Gerardo C. Villafuerte Jr. – O&M Supervisor - DAS
  • Contact #: 0926-785-7588
  • Email: gc_villafuerte@cebeco3.com.ph

• Richyield Roentgen C. Hernando – Substation & Equipment Maintenance Supervisor
  • Contact #: (032) 467-8557
  • Email: rrc_hernando@cebeco3.com.ph

• Marlon C. Dupal-ag – Staking / Design Supervisor
  • Contact #: (032) 467-8557
  • Email: mc_dupalag@cebeco3.com.ph

• Teresito M. Ohagan – Construction Supervisor
  • Contact #: (032) 467-8557
  • Email: tm_ohagan@cebeco3.com.ph

• Sandra T. Candelada – Technical Staff Engineer
  • Contact #: (032) 467-8557
  • Email: st_candelada@cebeco3.com.ph

• Fritzie B. Cabanilla – Meter Reader, Billing & Collection Section Head
  • Contact #: (032) 467-8131
  • Email: fbcabanilla@cebeco3.com.ph
"#,
    r#"ONLINE BILL INQUIRY
Consumers can check their electricity bills online by visiting: https://www.cebeco3.com.ph/online-bill-inquiry/
For assistance, call or text: 0917-624-4406"#,
    r#"MOBILE APPLICATION
CEBECO III offers a mobile application for checking electricity bills, viewing payment and consumption history, submitting complaints, and checking for news and announcements.
Available on Google Play: https://play.google.com/store/apps/details?id=com.cebeco3.mobile"#,
    r#"RATE SCHEDULE FOR THE YEAR 2025
As of March 2025, the rate schedule includes:
• Generation System Charge: Php 6.2976/kWh
• Transmission System Charge: Php 1.0563/kWh
• Distribution System Charge: Php 0.5432/kWh
• Supply System Charge: Php 0.5143/kWh
• Metering System Charge: Php 0.1134/kWh
• System Loss Charge: Php 0.8961/kWh
• Universal Charges: Php 0.0156/kWh
• Taxes: Php 0.0123/kWh
Note: Rates are subject to change based on ERC approvals and market conditions."#,
    r#"SERVICE INTERRUPTION NOTICES
CEBECO III schedules power service interruptions for maintenance and upgrades.
Notices are posted on the official website: https://www.cebeco3.com.ph/news/
Consumers are advised to check regularly for updates."#,
    r#"BRANDING GUIDELINES
Always refer to the organization simply as “CEBECO III.” Do not use terms like
“utility company,” “distribution utility,” or “electric cooperative” when naming
or describing CEBECO III in any response."#,
];

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("corpus file {path} must be a YAML list of strings: {message}")]
    Parse { path: String, message: String },
    #[error("knowledge corpus is empty")]
    Empty,
}

/// Loads the knowledge chunks, preferring `path` when given.
///
/// Blank entries are dropped; a corpus with nothing left is an error since the
/// index cannot be built without at least one vector.
pub fn load_corpus(path: Option<&Path>) -> Result<Vec<String>, CorpusError> {
    let chunks: Vec<String> = match path {
        Some(path) => {
            let display = path.display().to_string();
            let contents = fs::read_to_string(path).map_err(|source| CorpusError::Read {
                path: display.clone(),
                source,
            })?;
            serde_yaml::from_str::<Vec<String>>(&contents).map_err(|e| CorpusError::Parse {
                path: display,
                message: e.to_string(),
            })?
        }
        None => DEFAULT_CORPUS.iter().map(|c| c.to_string()).collect(),
    };

    let chunks: Vec<String> = chunks
        .into_iter()
        .filter(|chunk| !chunk.trim().is_empty())
        .collect();

    if chunks.is_empty() {
        return Err(CorpusError::Empty);
    }
    Ok(chunks)
}
