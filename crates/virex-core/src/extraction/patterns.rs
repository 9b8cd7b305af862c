//! Built-in pattern set for bilingual (French/English) transfer orders.
//!
//! Alternatives are listed most specific first; later entries cover
//! layout variants seen in rendered PDFs (line breaks moved, labels
//! split across lines, en dash vs plain separators).

/// Field name and its ordered pattern alternatives.
pub type FieldPatterns = (&'static str, &'static [&'static str]);

/// Fields of a transfer order, in report order.
pub const TRANSFER_ORDER_FIELDS: &[FieldPatterns] = &[
    (
        "Entité",
        &[
            r"4\s*44\s*=\s*([A-Z\s]+)\n[A-Z\s]+\n",
            r"AXA\s+[A-Za-zÉÈÊÛÔÎÏ ]+",
        ],
    ),
    (
        "Direction",
        &[
            r"DIRECTION FINANCIERE\s+SERVICE TRESORERIE",
            r"Direction\s+[^\n]*",
        ],
    ),
    (
        "contact1AXA",
        &[
            r"Direction Financière Service Trésorerie\s*([\w\s]+Denis\s+\d{2}\s\d{2}\s\d{2}\s\d{2}\s\d{2})",
            r"Direction Financière – Service Trésorerie\s*\n\s*([^\n]+\d{2}\s\d{2}\s\d{2}\s\d{2}\s\d{2})",
        ],
    ),
    (
        "contact2AXA",
        &[
            r"Direction Financière Service Trésorerie\s*.*?\s*(HAMON Pascal\s+\d{2}\s\d{2}\s\d{2}\s\d{2}\s\d{2})",
            r"Direction Financière – Service Trésorerie\s*\n\s*[^\n]+\d{2}\s\d{2}\s\d{2}\s\d{2}\s\d{2}\s*\n\s*([^\n]+\d{2}\s\d{2}\s\d{2}\s\d{2}\s\d{2})",
        ],
    ),
    (
        "contact3AXA",
        &[
            r"Direction Financière Service Trésorerie[\s\S]*?(VUONG THI Thien\s+\d{2}\s\d{2}\s\d{2}\s\d{2}\s\d{2})",
            r"Direction Financière – Service Trésorerie\s*(?:\n\s*[^\n]+){2}\n\s*([^\n]+\d{2}\s\d{2}\s\d{2}\s\d{2}\s\d{2})",
        ],
    ),
    (
        "Destinataire",
        &[
            r"Mail\s*:\s*[^\n]*\n\s*([^\n]+)",
        ],
    ),
    (
        "Tel Destinataire",
        &[
            r"Tel\s*:\s*(\d{2}\s\d{2}\s\d{2}\s\d{2}\s\d{2})",
        ],
    ),
    (
        "Fax Destinataire",
        &[
            r"Fax\s*:\s*(\d{2}\s\d{2}\s\d{2}\s\d{2}\s\d{2})",
        ],
    ),
    (
        "Date Document",
        &[
            r"(?:\ble\b|\bon\b)\s*(\d{2}/\d{2}/\d{4})",
        ],
    ),
    (
        "Référence",
        &[
            r"Notre référence\s*/\s*Our reference:\s*(\d+)",
        ],
    ),
    (
        "Compte à débiter",
        &[
            r"Par le débit de notre\s+compte n°\s*/\s*From\s+our bank\s+account number\s+([A-Z]{2}\d{2}(?:\s?[A-Z0-9]{4}){5}\s?[A-Z0-9]{3})\s+Swift:",
            r"Par le débit de notre compte n°\s*/\s*From\s+our bank account number\s+([A-Z]{2}\d{2}(?:\s?[A-Z0-9]{4}){5}\s?[A-Z0-9]{3})\s+Swift:",
            r"Par le débit de notre compte n°\s*/\s*From\s+our bank account number\s*([A-Z]{2}\d{2}(?:\s\d{4}){5}\s\d{3})",
            r"Par le débit de notre\s*compte n°\s*/\s*From our\s*bank account number\s*([A-Z]{2}\d{2}(?:\s\d{4}){4})",
            r"Par le débit de notre\s*compte n°\s*/\s*From our bank\s*account number\s*([A-Z]{2}\d{2}(?:\s\d{4}){4})",
            r"Par le débit de notre compte\s*n°\s*/\s*From our bank account\s*number\s*([A-Z]{2}\d{2}(?:\s\d{4}){4})",
            r"Par le débit de notre compte n°\s*/\s*From\s*our bank account number\s*([A-Z]{2}\d{2}(?:\s\d{4}){4})",
            r"Par le débit de notre compte n°\s*/\s*From our bank account\s*number\s*([A-Z]{2}\d{2}(?:\s\d{4}){4})",
            r"Par le débit de notre\s*compte n°\s*/\s*From our bank\s*account number\s*([A-Z]{2}\d{2}(?:\s\d{4}){5})",
            r"bank account number\s*(\w{2}\d{2}\s\d{4}\s\d{4}\s\d{4}\s\d{4}\s\d{4}\s\d{3})",
            r"Par le débit de notre compte n°\s*/\s*From our bank account\s*number\s*([A-Z]{2}\d{2}(?:\s\d{4}){5})",
            r"Par le débit de notre compte\s*n°\s*/\s*From our bank account\s*number\s*([A-Z]{2}\d{2}(?:\s\d{4}){5})",
        ],
    ),
    (
        "SWIFT",
        &[
            r"Swift:\s*([A-Z0-9]+)",
        ],
    ),
    (
        "Titulaire de compte",
        &[
            r"Swift:\s*[A-Z0-9]+\s*(.*)",
        ],
    ),
    (
        "Montant décaissement",
        &[
            r"Veuillez virer la somme\s*de\s*/\s*Please transfer the\s*amount of\s*([\d,]+\.\d{2})",
            r"Veuillez virer la somme de\s*/\s*Please\s*transfer the amount of\s*\n\s*([\d,]+\.\d{2})",
            r"Veuillez virer la somme de\s*/\s*Please transfer the\s*amount of\s*([\d.,]+)",
            r"transfer the amount of\s*\n\s*(\d{1,3}(?:\s\d{3})*,\d{2})",
            r"Veuillez virer la somme de\s*/\s*Please transfer the amount\s*of\s*\n\s*([\d,]+\.\d{2})",
        ],
    ),
    (
        "Devise",
        &[
            r"Veuillez virer la somme de\s*/\s*Please\s*transfer the amount of\s*[\d\s,.]+\s([A-Z]{3})",
            r"Veuillez virer la somme\s*de\s*/\s*Please transfer the\s*amount of\s*[\d,]+\.\d{2}\s([A-Z]{3})",
            r"Veuillez virer la somme de\s*/\s*Please\s*transfer the amount of\s*\n\s*[\d,]+\.\d{2}\s([A-Z]+)",
            r"Veuillez virer la somme de\s*/\s*Please transfer the amount\s*of\s*\n\s*[^\d\n]*[\d,]+\.[\d]{2}\s([^\s]+)",
        ],
    ),
    (
        "Date valeur compensée",
        &[
            r"Date de valeur\s*compensée\s*/\s*Compensated value\s*date\s*(\d{2}/\d{2}/\d{4})",
            r"Date de valeur\s*compensée\s*/\s*Compensated value date\s*([\d/]+)",
        ],
    ),
    (
        "Bénéficiaire",
        &[
            r"Nom bénéficiaire\s*/\s*Beneficiary name\s*IBAN\s*/\s*IBAN\s*(.*)",
            r"IBAN / IBAN\s*\n\s*([^\n]+)",
        ],
    ),
    (
        "IBAN Bénéficiaire",
        &[
            r"IBAN\s*/\s*IBAN[\s\S]*?AXA FRANCE VIE[\s\S]*?HO[\s\S]*?(FR\d{2}(?:\s?\d{4}){5}\s?[A-Z0-9]{3})[\s\S]*?Banque bénéficiaire\s*/\s*Beneficiary[\s\S]*?bank[\s\S]*?Code Swift\s*/\s*Swift code",
            r"IBAN\s*/\s*IBAN\s+AXA FRANCE VIE\s+HO\s+([A-Z]{2}\d{2}(?:\s\d{4}){5}\s[A-Z0-9]{3})\s+Banque bénéficiaire\s*/\s*Beneficiary bank\s+Code Swift\s*/\s*Swift code",
            r"IBAN\s*/\s*IBAN[\s\S]*?([A-Z]{2}\d{2}[A-Z0-9]+)",
            r"Nom bénéficiaire\s*/\s*Beneficiary name\s*IBAN\s*/\s*IBAN[\s\S]*?(FR\d{2}\s\d{4}\s\d{4}\s\d{4}\s\d{4}\s\d{3})",
            r"IBAN / IBAN\s+[^\n]*\n[^\n]*\n([A-Z]{2}\d{2}(?:\s\d{4}){5})",
        ],
    ),
    (
        "Banque Bénéficiaire",
        &[
            r"Banque bénéficiaire\s*/\s*Beneficiary bank\s*Code Swift\s*/\s*Swift code\s*(\w+)",
            r"Banque bénéficiaire\s*/\s*Beneficiary\s*bank\s*Code Swift\s*/\s*Swift code\s*([A-Z]{4})",
        ],
    ),
    (
        "Swift Bénéficiaire",
        &[
            r"Banque bénéficiaire\s*/\s*Beneficiary bank\s*Code Swift\s*/\s*Swift code[\s\S]*?([A-Z]{4}[A-Z0-9]{3,})",
            r"Code Swift\s*/\s*Swift code\s*(?:\n\s*[^\n]*){1,2}\s*([A-Z]{8}[A-Z0-9]{3})",
        ],
    ),
    (
        "Motif du paiement",
        &[
            r"Référence à indiquer sur le\s+virement -Détail Réf de\s+l['’]opération\s*/\s*Transfer\s+reference\s*([A-Z0-9]+)",
            r"Motif du paiement\s*/\s*Payment purpose\s*/\s*Transfer reference\s*([^\s]+)",
            r"Détail Réf de l['’]opération\s*/\s*Transfer reference\s*(.*)",
            r"Détail Réf de l['’]opération\s*/\s*Transfer\s*reference\s*([^\s]+)",
        ],
    ),
    (
        "Référence de l'opération",
        &[
            r"Détail Réf de l['’]opération\s*/\s*Transfer reference[\s\S]*?(Transfer id\s*\d+\s.*)",
            r"Transfer id[^\n]*",
        ],
    ),
    (
        "Signataire1",
        &[
            r"Signatures autorisées\s*/\s*Authorized signatures[\s\S]*?(\b[A-Z]+\s[A-Z]+\s[A-Za-z]+)",
            r"Signatures autorisées\s*/\s*Authorized signatures\s*\n\s*([^\n]+)",
        ],
    ),
    (
        "Signataire2",
        &[
            r"Signatures autorisées\s*/\s*Authorized signatures[\s\S]*\s([A-Z]+\s[A-Za-z]+(?:\s[A-Za-z]+)*)\s*$",
            r"Signatures autorisées\s*/\s*Authorized signatures[\s\S]*?\n\s*([A-Z]+\s[A-Z]+\s[A-Za-z]+)\s*\n\s*([A-Z]+\s[A-Z]+\s[A-Za-z]+)",
            r"Signatures autorisées / Authorized signatures\s*(?:.*\n){1}\s*(.*)",
        ],
    ),
];
