//! The catalog subject whitelist.
//!
//! The portal's search form only accepts subject codes from its own browse
//! listing, so queries are checked against this table before any request is
//! made. Codes are stored uppercase and sorted.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Every subject code the class search accepts, taken from the portal's
/// subject browse listing.
const SUBJECT_CODES: &[&str] = &[
    "ADMJ", "ADMPS", "AFRCNA", "AFROTC", "ANTH", "ARABIC", "ARTSC", "ASL", "ASTRON", "ATHLTR",
    "BACC", "BCHS", "BECN", "BFAE", "BFIN", "BHRM", "BIND", "BIOENG", "BIOETH", "BIOINF", "BIOSC",
    "BIOST", "BMIS", "BMKT", "BOAH", "BORG", "BQOM", "BSEO", "BSPP", "BUS", "BUSACC", "BUSADM",
    "BUSBIS", "BUSECN", "BUSENV", "BUSERV", "BUSFIN", "BUSHRM", "BUSMKT", "BUSORG", "BUSQOM",
    "BUSSCM", "BUSSPP", "CDACCT", "CDENT", "CEE", "CGS", "CHE", "CHEM", "CHIN", "CLASS", "CLRES",
    "CLST", "CMME", "CMMUSIC", "CMPBIO", "CMPINF", "COE", "COEA", "COEE", "COMMRC", "CS", "CSD",
    "DENHYG", "DENT", "DIASCI", "DMED", "DSANE", "DUPOSC", "EAS", "ECE", "ECON", "EDUC", "EM",
    "ENDOD", "ENGCMP", "ENGFLM", "ENGLIT", "ENGR", "ENGSCI", "ENGWRT", "ENRES", "EOH", "EPIDEM",
    "FACDEV", "FILMG", "FILMST", "FP", "FR", "FTADMA", "FTDA", "FTDB", "FTDC", "FTDJ", "FTDR",
    "GEOL", "GER", "GERON", "GREEK", "GREEKM", "GSWS", "HAA", "HEBREW", "HIM", "HINDI", "HIST",
    "HONORS", "HPA", "HPM", "HPS", "HRS", "HUGEN", "IDM", "IE", "IL", "IMB", "INFSCI", "INTBP",
    "IRISH", "ISB", "ISSP", "ITAL", "JPNSE", "JS", "KOREAN", "LATIN", "LAW", "LCTL", "LDRSHP",
    "LEGLST", "LING", "LIS", "LSAP", "MATH", "ME", "MED", "MEDEDU", "MEMS", "MILS", "MOLBPH",
    "MSBMS", "MSCBIO", "MSCBMP", "MSCMP", "MSE", "MSMBPH", "MSMGDB", "MSMI", "MSMPHL", "MSMVM",
    "MSNBIO", "MUSIC", "NEURO", "NPHS", "NROSCI", "NUR", "NURCNS", "NURNM", "NURNP", "NURSAN",
    "NURSP", "NUTR", "ODO", "ORBIOL", "ORSUR", "OT", "PAS", "PEDC", "PEDENT", "PEDS", "PERIO",
    "PERS", "PETE", "PHARM", "PHIL", "PHYS", "PIA", "POLISH", "PORT", "PROSTH", "PS", "PSY",
    "PSYC", "PSYED", "PT", "PUBHLT", "PUBSRV", "PWEA", "QUECH", "REHSCI", "REL", "RELGST",
    "RESTD", "RUSS", "SA", "SERCRO", "SLAV", "SLOVAK", "SOC", "SOCWRK", "SPAN", "STAT", "SWAHIL",
    "SWBEH", "SWCED", "SWCOSA", "SWE", "SWGEN", "SWINT", "SWRES", "SWWEL", "TELCOM", "THEA",
    "TURKSH", "UKRAIN", "URBNST", "VIET",
];

static SUBJECTS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| SUBJECT_CODES.iter().copied().collect());

/// Whether `code` is a known subject. Exact match; callers uppercase first.
pub(crate) fn is_valid(code: &str) -> bool {
    SUBJECTS.contains(code)
}
