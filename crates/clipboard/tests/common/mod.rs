use clipnest_clipboard::{
    ClipboardContent, ClipboardLoad, ClipboardLoadExt, ClipboardStore, ClipboardStoreExt, Error,
};

pub trait ClipboardTester {
    type Clipboard: 'static + Clone + Sync + Send + ClipboardLoad + ClipboardStore;

    /// # Errors
    fn new_clipboard(&self) -> Result<Self::Clipboard, Error>;

    fn run(&self) -> Result<(), Error> {
        self.test_clean()?;

        for i in 0..16 {
            let data_size = 1 << i;
            self.test_store_and_load(data_size)?;
        }

        self.test_image()?;
        self.test_shared_between_clones()?;
        Ok(())
    }

    fn test_store_and_load(&self, len: usize) -> Result<(), Error> {
        let clipboard = self.new_clipboard()?;

        let original_data: String = vec!['A'; len].into_iter().collect();
        clipboard.store(ClipboardContent::Plaintext(original_data.clone()))?;

        let loaded_data = clipboard.load_string()?;
        assert_eq!(loaded_data.len(), original_data.len());
        assert_eq!(loaded_data, original_data);

        Ok(())
    }

    fn test_clean(&self) -> Result<(), Error> {
        let data = "This is a string";
        let clipboard = self.new_clipboard()?;

        clipboard.store_string(data)?;
        assert_eq!(clipboard.load()?, ClipboardContent::Plaintext(data.to_string()));

        clipboard.clear()?;
        assert!(match clipboard.load() {
            Ok(ClipboardContent::Plaintext(s)) => s.is_empty(),
            Err(Error::Empty) => true,
            _ => false,
        });

        Ok(())
    }

    fn test_image(&self) -> Result<(), Error> {
        let clipboard = self.new_clipboard()?;
        let image = ClipboardContent::Image {
            width: 2,
            height: 2,
            bytes: vec![0x7f; 16].into(),
        };

        clipboard.store(image.clone())?;
        assert_eq!(clipboard.load()?, image);
        assert!(matches!(clipboard.load_string(), Err(Error::Empty)));

        Ok(())
    }

    fn test_shared_between_clones(&self) -> Result<(), Error> {
        let clipboard = self.new_clipboard()?;
        let other = clipboard.clone();

        let writer = std::thread::spawn(move || other.store_string("from another thread"));
        writer.join().expect("writer thread panicked")?;

        assert_eq!(clipboard.load_string()?, "from another thread");
        Ok(())
    }
}
