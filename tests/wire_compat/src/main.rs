fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use blockxfer_protocol::{BlobUrl, BlockId, BlockList};
    use serde::Deserialize;

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Reads a fixture verbatim, without trimming.
    fn read_fixture(name: &str) -> String {
        let path = fixtures_dir().join(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
    }

    fn load_json<T: serde::de::DeserializeOwned>(name: &str) -> T {
        serde_json::from_str(&read_fixture(name))
            .unwrap_or_else(|e| panic!("failed to parse fixture {name}: {e}"))
    }

    #[derive(Debug, Deserialize)]
    struct BlockIdCase {
        sequence: u32,
        raw: String,
        encoded: String,
    }

    #[derive(Debug, Deserialize)]
    struct UrlCase {
        base_url: String,
        auth_suffix: String,
        sequence: u32,
        object_url: String,
        block_url: String,
        block_list_url: String,
    }

    #[test]
    fn fixture_block_ids() {
        let cases: Vec<BlockIdCase> = load_json("block_ids.json");
        assert!(!cases.is_empty());

        for case in cases {
            let id = BlockId::from_sequence(case.sequence).unwrap();
            assert_eq!(id.raw(), case.raw, "raw id for {}", case.sequence);
            assert_eq!(id.encoded(), case.encoded, "encoding for {}", case.sequence);

            let decoded = BlockId::decode(&case.encoded).unwrap();
            assert_eq!(decoded.sequence(), case.sequence);
        }
    }

    #[test]
    fn fixture_block_ids_are_query_safe() {
        let cases: Vec<BlockIdCase> = load_json("block_ids.json");
        for case in cases {
            assert!(
                case.encoded.bytes().all(|b| b.is_ascii_alphanumeric()),
                "{} needs escaping",
                case.encoded
            );
        }
    }

    #[test]
    fn fixture_block_list_bytes() {
        let expected = read_fixture("block_list_4.xml");
        let ids: Vec<BlockId> = (0..4).map(|i| BlockId::from_sequence(i).unwrap()).collect();
        assert_eq!(BlockList::from_ids(&ids).to_xml(), expected);
    }

    #[test]
    fn fixture_block_list_parses() {
        let list = BlockList::parse(&read_fixture("block_list_4.xml")).unwrap();
        let sequences: Vec<u32> = list
            .entries()
            .iter()
            .map(|e| BlockId::decode(e).unwrap().sequence())
            .collect();
        assert_eq!(sequences, vec![0, 1, 2, 3]);
    }

    #[test]
    fn fixture_empty_block_list() {
        let expected = read_fixture("block_list_empty.xml");
        assert_eq!(BlockList::new().to_xml(), expected);
        assert!(BlockList::parse(&expected).unwrap().is_empty());
    }

    #[test]
    fn fixture_request_urls() {
        let cases: Vec<UrlCase> = load_json("request_urls.json");
        for case in cases {
            let url = BlobUrl::new(case.base_url, case.auth_suffix);
            let id = BlockId::from_sequence(case.sequence).unwrap();
            assert_eq!(url.object_url(), case.object_url);
            assert_eq!(url.block_url(&id), case.block_url);
            assert_eq!(url.block_list_url(), case.block_list_url);
        }
    }
}
