use crate::model::{Block, Cover, Section};
use crate::richtext::Span;
use crate::styles::{StyleName, WARNING_COLOR};
use crate::table::build_table;

fn cm<const N: usize>(widths: [f64; N]) -> Vec<f64> {
    widths.iter().map(|width| width * 10.0).collect()
}

fn numbered(title: &str) -> crate::model::SectionBuilder {
    Section::builder(title).start_on_new_page(true)
}

fn bullets<'a>(items: impl IntoIterator<Item = &'a str>) -> Vec<Block> {
    items.into_iter().map(Block::bullet).collect()
}

/// Title page with the document status table.
pub fn cover() -> Cover {
    Cover::new("TRAK")
        .with_title_line("Contracts Implementation Plan")
        .with_subtitle(Some(
            "Ugovori Module - Complete Technical Specification".to_string(),
        ))
        .with_block(Block::table(build_table(
            vec![
                vec!["Status", "FINAL - Ready for Implementation"],
                vec!["Version", "2.0"],
                vec!["Date", "January 2026"],
                vec!["Based On", "AgTravelSoft Analysis + My Travel Contract Example"],
            ],
            cm([4.0, 10.0]),
            false,
        )))
}

/// The thirteen numbered sections, in document order.
pub fn sections() -> Vec<Section> {
    vec![
        executive_summary(),
        business_requirements(),
        package_ownership(),
        contract_types(),
        database_schema(),
        contract_numbering(),
        pricing_and_currency(),
        payment_tracking(),
        contract_amendments(),
        document_templates(),
        ui_components(),
        implementation_phases(),
        technical_specifications(),
    ]
}

fn executive_summary() -> Section {
    numbered("1. Executive Summary")
        .push(Block::subheading("What We're Building"))
        .push(Block::body("A complete contract management system that:"))
        .extend(bullets([
            "Generates legally compliant travel contracts (Ugovori) for Serbian/BiH/Croatian markets",
            "Supports both direct sales (vlastiti paketi) and subagent resales (tudji paketi)",
            "Tracks payments linked to contracts with deposit/balance workflow",
            "Produces PDF documents matching legal requirements",
            "Auto-generates contracts with zero manual input when data is complete",
        ]))
        .push(Block::spacer_cm(0.5))
        .push(Block::subheading("Key Decisions Made"))
        .push(Block::table(build_table(
            vec![
                vec!["Decision", "Choice"],
                vec!["Package Ownership", "Toggle: Vlastiti (own) vs Tudji (external)"],
                vec!["External Organizer", "Free text with legal warning (not all in Trak)"],
                vec!["Contract Types", "B2C (customer) + B2B (agency-to-agency)"],
                vec!["Contract Numbering", "Separate sequences: 1/2026 (B2C), B-1/2026 (B2B)"],
                vec!["Currency", "Based on organization's operating country"],
                vec!["Pricing Model", "Wholesale + Margin % = Retail (per-package)"],
                vec!["Capacity Deduction", "On B2B confirmation, or B2C creation if no B2B"],
                vec!["Payment Tracking", "Linked to contracts (not separate module)"],
                vec!["Signatures", "Print & sign (MVP), digital signature (future)"],
                vec!["Amendments", "Anex ugovora system (legal paper trail)"],
                vec!["Templates", "Hybrid: locked legal structure + customizable branding"],
            ],
            cm([5.0, 11.0]),
            true,
        )))
        .build()
}

fn business_requirements() -> Section {
    numbered("2. Business Requirements")
        .push(Block::subheading("Three-Party Structure"))
        .push(Block::body("Every travel contract involves up to three parties:"))
        .push(Block::table(build_table(
            vec![
                vec!["Party", "Role", "Responsibilities"],
                vec!["ORGANIZATOR\n(Tour Operator)", "Creates packages", "Sets wholesale price, confirms bookings"],
                vec!["SUBAGENT\n(Selling Agency)", "Sells to customers", "Adds margin, issues contracts, collects payments"],
                vec!["NOSILAC\n(Contract Holder)", "Signs contract", "Makes payments, travels with saputnici"],
            ],
            cm([4.0, 4.0, 8.0]),
            true,
        )))
        .push(Block::spacer_cm(0.5))
        .push(Block::subheading("Two Sales Scenarios"))
        .push(Block::bold_body("Scenario 1: Own Package (Vlastiti)"))
        .extend(bullets([
            "Agency IS the tour operator",
            "Single contract: Agency -> Customer",
            "Agency keeps 100% of revenue",
        ]))
        .push(Block::spacer_cm(0.3))
        .push(Block::bold_body("Scenario 2: External Package (Tudji)"))
        .extend(bullets([
            "Agency is reselling another operator's package",
            "Two linked contracts:",
        ]))
        .push(Block::bullet_line(vec![Span::new(
            "  - B2B: Organizer -> Subagent (wholesale price)",
        )]))
        .push(Block::bullet_line(vec![Span::new(
            "  - B2C: Subagent -> Customer (retail price)",
        )]))
        .push(Block::bullet("Subagent keeps the margin"))
        .build()
}

fn package_ownership() -> Section {
    numbered("3. Package Ownership Model")
        .push(Block::body(
            "When creating/editing a package, agents must specify ownership via a toggle:",
        ))
        .push(Block::bullet_line(vec![
            Span::new("Vlastiti paket").bold(),
            Span::new(" - Your agency is the tour operator"),
        ]))
        .push(Block::bullet_line(vec![
            Span::new("Tudji paket (preprodaja)").bold(),
            Span::new(" - Selling another operator's package"),
        ]))
        .push(Block::spacer_cm(0.5))
        .push(Block::subheading("When 'Tudji paket' is Selected"))
        .push(Block::rich(
            StyleName::DocBody,
            vec![
                Span::new("LEGAL WARNING:").bold().colored(WARNING_COLOR),
                Span::new(
                    " The external organizer name field displays a prominent warning: \
                     'Enter the EXACT LEGAL NAME of the tour operator as registered. \
                     Incorrect name may cause an INVALID CONTRACT and legal problems.'",
                ),
            ],
        ))
        .push(Block::spacer_cm(0.3))
        .push(Block::body("Pricing Fields for Resale:"))
        .push(Block::table(build_table(
            vec![
                vec!["Field", "Description", "Example"],
                vec!["Nabavna cijena", "Wholesale price from organizer", "450.00 EUR"],
                vec!["Vasa marza (%)", "Your markup percentage", "12%"],
                vec!["Prodajna cijena", "Auto-calculated retail price", "504.00 EUR"],
                vec!["Vasa zarada", "Your profit per person", "54.00 EUR"],
            ],
            cm([4.0, 7.0, 5.0]),
            true,
        )))
        .build()
}

fn contract_types() -> Section {
    numbered("4. Contract Types & Flows")
        .push(Block::subheading("Contract Type Definitions"))
        .push(Block::table(build_table(
            vec![
                vec!["Type", "Code", "Numbering", "Purpose"],
                vec!["Customer Contract", "B2C", "1/2026, 2/2026...", "Agency -> Customer"],
                vec!["Agency Contract", "B2B", "B-1/2026, B-2/2026...", "Organizer -> Subagent"],
                vec!["Amendment", "ANEX", "Anex #1 uz Ugovor 5/2026", "Changes to existing contract"],
            ],
            cm([4.0, 2.5, 5.0, 4.5]),
            true,
        )))
        .push(Block::spacer_cm(0.5))
        .push(Block::subheading("Contract Status Flow"))
        .push(Block::table(build_table(
            vec![
                vec!["Status", "Serbian", "Description"],
                vec!["draft", "priprema", "Contract being prepared, not yet sent"],
                vec!["sent", "poslano", "Sent to customer, awaiting signature"],
                vec!["signed", "potpisano", "Customer signed, deposit received"],
                vec!["completed", "zavrseno", "Travel completed, fully paid"],
                vec!["cancelled", "storno", "Cancelled before travel"],
                vec!["rejected", "odbijeno", "B2B only: Organizer rejected booking"],
            ],
            cm([3.0, 3.0, 10.0]),
            true,
        )))
        .push(Block::spacer_cm(0.5))
        .push(Block::subheading("Document Visibility Rules"))
        .push(Block::table(build_table(
            vec![
                vec!["Document", "Organizer Sees", "Subagent Sees", "Customer Sees"],
                vec!["B2B Contract", "Wholesale price", "Wholesale price", "Never"],
                vec!["B2C Contract", "Never", "Full document", "Full document"],
                vec!["Customer Contract Header", "-", "Listed as Subagent", "Both agencies listed"],
            ],
            cm([4.0, 4.0, 4.0, 4.0]),
            true,
        )))
        .build()
}

fn database_schema() -> Section {
    numbered("5. Database Schema")
        .push(Block::subheading("Core Tables"))
        .push(Block::table(build_table(
            vec![
                vec!["Table", "Purpose", "Key Fields"],
                vec!["contracts", "Main contract records", "contract_number, customer_id, package_id, total_amount, status"],
                vec!["contract_passengers", "Travelers on contract", "contract_id, first_name, last_name, is_lead, passenger_type"],
                vec!["contract_services", "Line items/pricing", "contract_id, service_type, description, quantity, total_price"],
                vec!["contract_payments", "Payment records", "contract_id, payment_date, amount, payment_method, status"],
                vec!["contract_amendments", "Anex records", "contract_id, amendment_number, change_type, price_difference"],
                vec!["customers", "Customer database", "first_name, last_name, phone, email, total_contracts"],
            ],
            cm([4.0, 4.0, 8.0]),
            true,
        )))
        .push(Block::spacer_cm(0.5))
        .push(Block::subheading("Package Ownership Fields (to add)"))
        .push(Block::table(build_table(
            vec![
                vec!["Field", "Type", "Description"],
                vec!["ownership_type", "TEXT ('own', 'resale')", "Whether package is vlastiti or tudji"],
                vec!["external_organizer_name", "TEXT", "LEGAL REQUIREMENT: Exact name of tour operator"],
                vec!["wholesale_price", "DECIMAL(10,2)", "Price agency pays to organizer"],
                vec!["margin_percent", "DECIMAL(5,2)", "Agency markup percentage"],
            ],
            cm([5.0, 4.5, 6.5]),
            true,
        )))
        .build()
}

fn contract_numbering() -> Section {
    numbered("6. Contract Numbering")
        .push(Block::body(
            "B2C and B2B contracts use separate numbering sequences:",
        ))
        .push(Block::table(build_table(
            vec![
                vec!["Type", "Format", "Examples"],
                vec!["B2C (Customer)", "number / year", "1 / 2026, 2 / 2026, 3 / 2026..."],
                vec!["B2B (Agency)", "B-number / year", "B-1 / 2026, B-2 / 2026, B-3 / 2026..."],
                vec!["Amendment", "Anex #N uz Ugovor X/Y", "Anex #1 uz Ugovor 15 / 2026"],
            ],
            cm([4.0, 4.0, 8.0]),
            true,
        )))
        .build()
}

fn pricing_and_currency() -> Section {
    numbered("7. Pricing & Currency")
        .push(Block::subheading("Currency by Country"))
        .push(Block::table(build_table(
            vec![
                vec!["Country", "Currency Code", "Symbol"],
                vec!["Bosnia & Herzegovina (ba)", "BAM", "KM"],
                vec!["Serbia (rs)", "RSD", "RSD"],
                vec!["Croatia (hr)", "EUR", "\u{20ac}"],
                vec!["Montenegro (me)", "EUR", "\u{20ac}"],
            ],
            cm([6.0, 5.0, 5.0]),
            true,
        )))
        .push(Block::spacer_cm(0.5))
        .push(Block::subheading("Resale Pricing Formula"))
        .push(Block::bold_body(
            "Retail Price = Wholesale Price x (1 + Margin% / 100)",
        ))
        .push(Block::body(
            "Example: Wholesale 450 EUR + 12% margin = 504 EUR retail (54 EUR profit)",
        ))
        .build()
}

fn payment_tracking() -> Section {
    numbered("8. Payment Tracking")
        .push(Block::body(
            "Payments are linked directly to contracts with deposit/balance tracking:",
        ))
        .push(Block::table(build_table(
            vec![
                vec!["Step", "Action", "Result"],
                vec!["1", "Contract Created", "Deposit due (30% default)"],
                vec!["2", "Deposit Paid", "Status: draft -> signed"],
                vec!["3", "Balance Due", "7-14 days before departure"],
                vec!["4", "Fully Paid", "amount_remaining = 0"],
                vec!["5", "Travel Complete", "Status: signed -> completed"],
            ],
            cm([2.0, 5.0, 9.0]),
            true,
        )))
        .push(Block::spacer_cm(0.5))
        .push(Block::subheading("Payment Methods"))
        .push(Block::table(build_table(
            vec![
                vec!["Code", "Serbian", "English"],
                vec!["cash", "gotovina", "Cash"],
                vec!["bank_transfer", "uplata na racun", "Bank Transfer"],
                vec!["card", "kartica", "Card"],
                vec!["online", "online placanje", "Online Payment"],
            ],
            cm([4.0, 6.0, 6.0]),
            true,
        )))
        .build()
}

fn contract_amendments() -> Section {
    numbered("9. Contract Amendments (Anex)")
        .push(Block::body(
            "Following the AgTravelSoft model, contract changes are documented via Anex (amendments):",
        ))
        .push(Block::table(build_table(
            vec![
                vec!["Change Type", "Requires Anex?", "Example"],
                vec!["Date change", "Yes", "Moving from July 15 to July 22"],
                vec!["Add passenger", "Yes", "Adding a child to booking"],
                vec!["Remove passenger", "Yes", "One person cannot travel"],
                vec!["Room upgrade", "Yes", "Standard -> Sea View"],
                vec!["Price correction", "Yes", "Error in original calculation"],
                vec!["Contact info update", "No", "New phone number"],
                vec!["Internal notes", "No", "Agent notes"],
            ],
            cm([4.0, 3.0, 9.0]),
            true,
        )))
        .build()
}

fn document_templates() -> Section {
    numbered("10. Document Templates")
        .push(Block::subheading("Hybrid Template System"))
        .push(Block::bold_body("Locked Legal Structure (cannot be modified):"))
        .extend(bullets([
            "Contract header with number and date",
            "Three-party information section",
            "Passengers table",
            "Accommodation details",
            "Services/pricing table",
            "Financial summary",
            "Payment specification",
            "Terms and conditions footer",
            "Signature section",
        ]))
        .push(Block::spacer_cm(0.3))
        .push(Block::bold_body("Customizable Elements:"))
        .extend(bullets([
            "Agency logo",
            "Header colors/styling",
            "Contact information layout",
            "Additional terms section (can add, not remove required parts)",
            "Footer notes",
            "Font preferences (within approved set)",
        ]))
        .push(Block::spacer_cm(0.5))
        .push(Block::subheading("Required Documents"))
        .push(Block::table(build_table(
            vec![
                vec!["Document", "Serbian Name", "When Generated", "Purpose"],
                vec!["Contract", "Ugovor", "On creation", "Legal agreement with customer"],
                vec!["B2B Contract", "TRGO Ugovor", "For resale packages", "Agreement with organizer"],
                vec!["Amendment", "Anex", "On changes", "Document changes to contract"],
                vec!["Pro-forma Invoice", "Profaktura", "For deposit", "Request advance payment"],
                vec!["Invoice", "Faktura", "After payment", "Tax document"],
                vec!["Voucher", "Vaucer", "Before travel", "Hotel check-in document"],
                vec!["Confirmation", "Potvrda rezervacije", "After deposit", "Booking confirmation"],
            ],
            cm([3.5, 3.5, 3.5, 5.5]),
            true,
        )))
        .build()
}

fn ui_components() -> Section {
    numbered("11. UI Components")
        .push(Block::subheading("Pages to Build"))
        .push(Block::table(build_table(
            vec![
                vec!["Page", "Route", "Features"],
                vec!["Contract List", "/dashboard/contracts", "Filters, search, stats bar, pagination"],
                vec!["Contract Detail", "/dashboard/contracts/[id]", "Overview, passengers, services, payments, documents, history tabs"],
                vec!["New Contract", "/dashboard/contracts/new", "Wizard: package -> departure -> customer -> passengers -> services -> generate"],
                vec!["Customer List", "/dashboard/customers", "Search, filters, customer cards"],
                vec!["Customer Detail", "/dashboard/customers/[id]", "Info, contract history, stats"],
            ],
            cm([3.5, 5.0, 7.5]),
            true,
        )))
        .push(Block::spacer_cm(0.5))
        .push(Block::subheading("Key UI Features"))
        .push(Block::bold_body("Auto-generation with Missing Fields Modal:"))
        .push(Block::body(
            "When generating a contract, if all data is complete, zero manual input required. \
             If any fields are missing, a modal appears showing only the fields that need to be filled.",
        ))
        .build()
}

fn implementation_phases() -> Section {
    numbered("12. Implementation Phases")
        .push(Block::table(build_table(
            vec![
                vec!["Phase", "Timeline", "Priority", "Deliverables"],
                vec!["1. Database & Core", "Week 1-2", "CRITICAL", "Migration files, TypeScript types, RLS policies"],
                vec!["2. Customer Management", "Week 2-3", "HIGH", "Customer CRUD, search component, lead conversion"],
                vec!["3. Contract CRUD", "Week 3-4", "HIGH", "List page, detail page, creation wizard, edit form"],
                vec!["4. Package Ownership", "Week 4-5", "HIGH", "Vlastiti/tudji toggle, organizer field, B2B contracts"],
                vec!["5. Payments", "Week 5-6", "HIGH", "Payment recording, status tracking, overdue alerts"],
                vec!["6. PDF Generation", "Week 6-7", "HIGH", "Contract PDF, B2B PDF, Voucher, Amendment PDFs"],
                vec!["7. Template Customization", "Week 7-8", "MEDIUM", "Logo upload, colors, additional terms"],
                vec!["8. Amendments", "Week 8-9", "MEDIUM", "Amendment flow, history view, PDF generation"],
                vec!["9. Integration & Polish", "Week 9-10", "MEDIUM", "Inquiry integration, dashboard stats, capacity"],
            ],
            cm([3.5, 2.5, 2.5, 7.5]),
            true,
        )))
        .build()
}

fn technical_specifications() -> Section {
    numbered("13. Technical Specifications")
        .push(Block::subheading("Tech Stack"))
        .push(Block::table(build_table(
            vec![
                vec!["Component", "Technology"],
                vec!["Frontend", "Next.js 14, React, TypeScript"],
                vec!["UI Components", "shadcn/ui, Tailwind CSS"],
                vec!["State Management", "React Query, Zustand"],
                vec!["Database", "Supabase (PostgreSQL)"],
                vec!["PDF Generation", "@react-pdf/renderer"],
                vec!["Form Handling", "React Hook Form, Zod"],
                vec!["Date Handling", "date-fns"],
            ],
            cm([5.0, 11.0]),
            true,
        )))
        .push(Block::spacer_cm(0.5))
        .push(Block::subheading("Success Metrics"))
        .push(Block::table(build_table(
            vec![
                vec!["Metric", "Target"],
                vec!["Contract creation time", "< 3 minutes (with complete data)"],
                vec!["Missing field completion", "< 2 minutes additional"],
                vec!["PDF generation time", "< 5 seconds"],
                vec!["Payment recording time", "< 30 seconds"],
                vec!["Amendment creation time", "< 2 minutes"],
            ],
            cm([6.0, 10.0]),
            true,
        )))
        .push(Block::spacer_cm(0.5))
        .push(Block::subheading("Risk Mitigation"))
        .push(Block::table(build_table(
            vec![
                vec!["Risk", "Mitigation"],
                vec!["Legal compliance", "Locked template sections, required fields"],
                vec!["Data migration", "Customer import tool from AgTravelSoft"],
                vec!["Performance", "Pagination, lazy loading, indexed queries"],
                vec!["PDF complexity", "Component-based templates, caching"],
            ],
            cm([5.0, 11.0]),
            true,
        )))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find_table<'a>(sections: &'a [Section], first_cell: &str) -> &'a crate::table::TableBlock {
        sections
            .iter()
            .flat_map(Section::tables)
            .find(|table| table.rows()[0][0] == first_cell)
            .unwrap_or_else(|| panic!("no table starting with {first_cell:?}"))
    }

    #[test]
    fn every_section_starts_on_a_new_page() {
        assert!(sections().iter().all(Section::starts_on_new_page));
    }

    #[test]
    fn key_decisions_table_has_eleven_decisions() {
        let sections = sections();
        let decisions = find_table(&sections, "Decision");
        assert_eq!(decisions.row_count(), 12);
        assert_eq!(decisions.column_count(), 2);
        assert!(decisions.has_header());
        assert_eq!(decisions.column_widths(), &[50.0, 110.0]);
    }

    #[test]
    fn nineteen_section_tables_all_rectangular() {
        let sections = sections();
        let tables: Vec<_> = sections.iter().flat_map(Section::tables).collect();
        assert_eq!(tables.len(), 19);
        assert!(tables.iter().all(|table| table.is_rectangular()));
        assert!(tables.iter().all(|table| table.has_header()));
    }

    #[test]
    fn tables_fit_the_page_body() {
        // A4 is 210 mm wide with 20 mm margins on each side.
        let body_width = 170.0;
        let sections = sections();
        for table in sections.iter().flat_map(Section::tables) {
            assert!(table.total_width() <= body_width, "{:?}", table.rows()[0]);
        }
    }

    #[test]
    fn cover_status_table_has_no_header() {
        let cover = cover();
        assert_eq!(cover.title_lines(), &["TRAK", "Contracts Implementation Plan"]);
        let status = cover.blocks()[0].as_table().expect("status table");
        assert!(!status.has_header());
        assert_eq!(status.row_count(), 4);
        assert_eq!(status.rows()[1], vec!["Version", "2.0"]);
    }

    #[test]
    fn implementation_phases_lists_nine_phases() {
        let sections = sections();
        let phases = find_table(&sections, "Phase");
        assert_eq!(phases.row_count(), 10);
        assert_eq!(phases.rows()[9][0], "9. Integration & Polish");
    }
}
