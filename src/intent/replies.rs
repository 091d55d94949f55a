//! Fixed answers for the high-volume intents.

pub const CUTOFF_REPLY: &str = r#"Here are the scheduled cut-off dates (“Petsa sa Pamutol”) by area:
  • Asturias – 4th of the month  
  • Balamban – 8th of the month  
  • Aloguinsan – 10th of the month  
  • Pinamungajan – 12th of the month  
  • Cebu City Areas – 12th of the month  
  • Special Bills – 14th of the month  
  • Lutopan – 24th of the month  
  • Toledo City – 27th of the month  

*Payments not received* by the cut-off date will result in service suspension plus a 2% monthly surcharge.  
However, per the ERC’s Magna Carta for Residential Electricity Consumers (Res. 12-09), CEBECO III *must* suspend any disconnection if:
  1. A customer’s household has someone on life-support equipment (medical cert. required).  
  2. A funeral wake is being held on the premises.  
  3. The customer never received the Final Disconnection Notice (FDN).  
  4. A billing error charged multiple months at once.  
  5. The customer settles the current bill within 24 hours of the first cut-off attempt (once per billing cycle).  

And *no disconnections* may occur on:
  – Fridays, weekends, national/local holidays, or the day before these.  
  – Holy Week (Maundy Thursday through Easter Sunday).  
  – Any ERC-declared moratorium days (e.g. grid emergencies, public calamities).  

Registered senior citizens, PWDs, or life-support households also get an automatic 30-day extension after the FDN."#;

pub const BILLING_REPLY: &str = "To check your current balance please send your Consumer ID.\n\
Payments can be made via GCash → Bills → CEBECO III, \
Palawan Pawnshop, 7-Eleven CliQQ or at any area office.";

pub const OUTAGE_REPLY: &str = "For outage reports please include your complete address and Consumer ID. \
Current grid advisory: see Power-Situation bulletins on our FB page. \
You may also call our 24×7 hotline (032) 467-9-112.";
