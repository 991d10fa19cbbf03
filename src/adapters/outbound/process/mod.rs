/// Adapters that drive external command-line tools
mod scancentral_packager;

pub use scancentral_packager::ScanCentralPackager;
