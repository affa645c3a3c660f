use cfg_aliases::cfg_aliases;

fn main() {
    cfg_aliases! {
        serde: { feature = "serde" },
        metadata: { feature = "metadata" },
    }
}
